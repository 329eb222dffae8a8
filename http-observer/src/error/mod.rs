//! Error handling for the HTTP observer
//!
//! Two error types cross the crate boundary:
//! - `TransportError`: a failed call exactly as the transport reported it.
//!   The observation pipeline only reads it; callers get it back untouched.
//! - `ClientError`: everything the client facade can return, with the
//!   transport failure carried as one of its variants.

use thiserror::Error;

pub mod transport;
pub use transport::{TransportError, TransportErrorKind};

/// Result type for HTTP observer operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type for the client facade
#[derive(Error, Debug)]
pub enum ClientError {
    /// The transport failed; the inner error is the original failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response payload could not be decoded into the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid client or transport configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ClientError::Configuration(message.into())
    }

    /// Borrow the transport failure, if this error carries one
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            ClientError::Transport(err) => Some(err),
            _ => None,
        }
    }

    /// Take the transport failure out of this error, if it carries one
    pub fn into_transport_error(self) -> Option<TransportError> {
        match self {
            ClientError::Transport(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of the failed call, when a response was received
    pub fn status_code(&self) -> Option<u16> {
        self.transport_error().and_then(TransportError::status_code)
    }

    /// Check if this error came from the transport
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Convert serde_json errors to ClientError
impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::decode(format!("JSON error: {}", err))
    }
}
