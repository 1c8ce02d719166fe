//! Error types for social-client-core.
//!
//! Everything that can fail in the core funnels into [`Error`]. Failures are
//! handled at the component boundary (a toast, a log line), never by panicking.

use thiserror::Error;

use crate::net::ApiError;

/// Errors produced by the client core.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction input, e.g. an unknown animation preset
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Backend request failed or returned an error body
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),
    /// JSON document (catalog, flags file) could not be parsed
    #[error("Failed to decode JSON: {0}")]
    Decode(#[from] serde_json::Error),
    /// Socket payload could not be decoded
    #[error("Failed to decode socket payload: {0}")]
    Payload(#[from] bincode::Error),
    /// Persisted client state could not be read or written
    #[error("Persisted state error: {0}")]
    Persist(String),
    /// Configuration file could not be parsed
    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a configuration error from anything printable.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// True for failures the user can retry by hand (network and API errors).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}
