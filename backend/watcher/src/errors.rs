//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}

pub type Result<T> = std::result::Result<T, WatcherError>;
