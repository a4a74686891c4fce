//! Client error types

use http::StatusCode;
use shared::EnvelopeError;
use thiserror::Error;

use crate::session::StorageError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Envelope carried a non-success code
    #[error("{message}")]
    Domain { code: i32, message: String },

    /// Transport-level failure status (non-2xx)
    #[error("HTTP error! status: {}", status.as_u16())]
    Status { status: StatusCode, body: String },

    /// Request failed without a response (timeout, connect, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not a well-formed envelope
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(#[from] EnvelopeError),

    /// Envelope was well-formed but lacked required data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No session to act on
    #[error("Authentication required")]
    NotAuthenticated,

    /// Event stream could not be read
    #[error("Stream error: {0}")]
    Stream(String),

    /// Navigation could not complete
    #[error("Navigation error: {0}")]
    Router(#[from] crate::router::RouterError),

    /// Session storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Domain error code, if the backend answered with a failure envelope
    pub fn domain_code(&self) -> Option<i32> {
        match self {
            Self::Domain { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Transport status, if the backend answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Request timed out before a response arrived
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.to_string().contains("timeout"),
            _ => false,
        }
    }

    /// Request never reached the backend
    pub fn is_network(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_connect() || e.to_string().contains("error sending request")
            }
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
