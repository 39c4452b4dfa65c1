//! Error handling and custom error types
//!
//! Provides unified error handling across the relay and its clients using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The inference provider answered with a non-success status.
    ///
    /// `message` is the provider's own `error` string when its body carried one.
    #[error("Inference provider error (status {status}): {}", .message.as_deref().unwrap_or("<no message>"))]
    Upstream {
        status: u16,
        message: Option<String>,
    },

    /// The relay answered with a non-success status, as seen by a client.
    #[error("{0}")]
    Relay(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, Error>;
