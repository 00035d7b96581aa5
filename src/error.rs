//! Error handling for the musicdl bridge
//!
//! Failures here never reach the process exit code: the CLI layer turns
//! every error into a JSON payload on stdout. The typed variants exist so
//! the source clients and the aggregator can tell network trouble apart
//! from malformed platform responses.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Platform response invalid: {reason}")]
    InvalidResponse { reason: String },

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl BridgeError {
    /// Shorthand for a malformed or unexpected platform payload.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        BridgeError::InvalidResponse {
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
