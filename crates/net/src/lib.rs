//! Sede Network Library
//!
//! HTTP clients for the clinic administration backend.
//!
//! # Architecture
//!
//! - **ApiClient**: pooled `reqwest` client, endpoint table, `x-user-id` header
//! - **HeadquarterDirectory**: directory fetch/create, behind a trait
//! - **Scoped clients**: calendar, patients, contracts, employees, rent and
//!   overview figures, each taking the optional `headquarterId` query
//!   parameters built by `sede-core`
//!
//! # Usage
//!
//! ```ignore
//! let api = ApiClient::new("http://localhost:3000", DEFAULT_TIMEOUT)?;
//! let directory = HeadquarterClient::new(api.clone()).fetch_all().await?;
//! let params = sede_core::build_query_params(Some(directory[0].id), &[]);
//! let entries = CalendarClient::new(api).entries(params.as_ref()).await?;
//! ```

pub mod auth;
pub mod calendar;
pub mod client;
pub mod error;
pub mod finance;
pub mod headquarters;
pub mod roster;
pub mod urls;

#[cfg(test)]
mod test_support;

pub use auth::AuthClient;
pub use calendar::CalendarClient;
pub use client::{ApiClient, DEFAULT_TIMEOUT, USER_ID_HEADER};
pub use error::{Error, Result};
pub use finance::FinanceClient;
pub use headquarters::{HeadquarterClient, HeadquarterDirectory};
pub use roster::RosterClient;
pub use urls::ApiUrls;
