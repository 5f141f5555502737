use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the blood bank backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Backend {
        status: StatusCode,
        /// Message taken from the backend's error payload, when it sent one.
        message: Option<String>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text to show the operator: the backend's own message when present,
    /// otherwise `fallback`.
    pub fn operator_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Backend {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure reading or writing the session storage area.
#[derive(Debug, Error)]
#[error("Session storage error: {0}")]
pub struct StorageError(pub String);

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError(err.to_string())
    }
}
