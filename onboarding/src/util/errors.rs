use reqwest::StatusCode;
use thiserror::Error;

/// Error raised by the third-party bank-link SDK seam.
///
/// The SDK reports an optional human-readable message; callers fall back to a
/// fixed string when it is absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .message.as_deref().unwrap_or("provider error"))]
pub struct ProviderError {
    pub message: Option<String>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }

    /// The SDK message, or `fallback` when the SDK gave none.
    pub fn message_or(&self, fallback: &str) -> String {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request to {url} failed with status: {status}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No accounts were linked")]
    NoLinkedAccounts,

    #[error("{0} not initialized")]
    MissingContext(&'static str),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The backend answered 404. This is the only status the pages single out.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
