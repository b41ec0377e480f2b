//! Application error type

use crate::selection::LoadError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] sede_core::Error),

    #[error(transparent)]
    Net(#[from] sede_net::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, Error>;
