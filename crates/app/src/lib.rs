//! Sede - headquarters-scoped client for the clinic admin backend
//!
//! Every screen reads the shared headquarter selection and scopes its
//! backend requests to it. The selection survives restarts in a local
//! SQLite store.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod selection;
pub mod state;
pub mod viewmodel;

#[cfg(test)]
mod test_support;
