//! Error model used by Toggl API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TogglError>;

#[derive(Debug, Error)]
pub enum TogglError {
    #[error("http {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TogglError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TogglError::Timeout(err.to_string())
        } else if err.is_connect() {
            TogglError::Network(err.to_string())
        } else if err.is_decode() {
            TogglError::Serialization(err.to_string())
        } else {
            TogglError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TogglError {
    fn from(err: serde_json::Error) -> Self {
        TogglError::Serialization(err.to_string())
    }
}
