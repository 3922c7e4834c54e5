use std::time::Duration;
use thiserror::Error;

/// Errors returned by street402 operations.
#[derive(Debug, Error)]
pub enum X402Error {
    #[error("config error: {0}")]
    ConfigError(String),

    #[error("http error: {0}")]
    HttpError(String),

    #[error("invalid payment challenge: {0}")]
    InvalidChallenge(String),

    /// No unlock event arrived before the deadline.
    #[error("timeout waiting for unlock after {0:?}")]
    Timeout(Duration),

    #[error("websocket error: {0}")]
    ConnectionError(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl X402Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, X402Error::Timeout(_))
    }
}
