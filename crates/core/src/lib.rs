//! Sede Core Library
//!
//! Models, headquarter selection rules and local storage for the Sede
//! clinic administration client.

pub mod error;
pub mod models;
pub mod selection;
pub mod storage;

pub use error::{Error, Result};
pub use models::*;
pub use selection::{
    build_query_params, encode_selection, resolve_selection, ParamValue, Preference, QueryParams,
    ALL_HEADQUARTERS, HEADQUARTER_PARAM, SELECTED_HEADQUARTER_KEY,
};
pub use storage::{Database, KeyValueStore, KvStore, StorageScope};
