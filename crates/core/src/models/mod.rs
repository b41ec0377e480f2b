//! Data models for Sede

mod calendar;
mod contract;
mod employee;
mod finance;
mod headquarter;
mod patient;
mod record;
mod user;

pub use calendar::*;
pub use contract::*;
pub use employee::*;
pub use finance::*;
pub use headquarter::*;
pub use patient::*;
pub use record::{list_under, parse_decimal, parse_timestamp, Record};
pub use user::*;
