//! Error types for skylight operations

use thiserror::Error;

use crate::model::SetStatus;

/// Result type alias for skylight operations
pub type Result<T> = std::result::Result<T, SkylightError>;

/// Error types for accessory status and reconciliation operations
#[derive(Error, Debug)]
pub enum SkylightError {
    /// Transport failures while talking to an accessory bridge
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed or unexpected accessory payloads
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found errors (windows, pairings, profiles)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A batched position write failed after classification succeeded.
    /// `status` reflects intent only; the mutation outcome is unknown.
    #[error("write characteristics: {source}")]
    Write {
        status: SetStatus,
        #[source]
        source: Box<SkylightError>,
    },
}

impl SkylightError {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a protocol error
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Check if error originated at the transport boundary
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SkylightError::Connection(_) | SkylightError::Protocol(_) | SkylightError::Http(_)
        )
    }
}
