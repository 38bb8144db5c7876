//! Error types for the CBS gateway.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors raised by the CBS gateway.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CbsError {
    /// Raised when the gateway configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when a request never reaches the API or its reply never
    /// arrives.
    #[error("transport error: {message}")]
    Transport {
        /// Message reported by the HTTP client.
        message: String,
    },
    /// Raised when the API answers with a non-success status.
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status code of the reply.
        status: u16,
        /// Body of the reply, if any.
        message: String,
    },
    /// Raised when a successful reply fails to decode.
    #[error("malformed api reply: {message}")]
    Decode {
        /// Message reported by the JSON decoder.
        message: String,
    },
}

impl From<ConfigError> for CbsError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<reqwest::Error> for CbsError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport {
            message: value.to_string(),
        }
    }
}
