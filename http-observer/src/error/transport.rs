//! Transport failures
//!
//! A `TransportError` is the failure value a transport hands back for a call.
//! It keeps the request configuration it was raised for and, when the server
//! did answer (an error status), the response that arrived.

use std::fmt;

use thiserror::Error;

use crate::transport::{ErrorResponse, RequestConfig};

/// Classification of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// A response arrived with a non-success status
    Status,

    /// The connection could not be established
    Connect,

    /// The request timed out
    Timeout,

    /// The request could not be built or sent
    Request,

    /// Redirect policy violated
    Redirect,

    /// The response body could not be read
    Body,

    /// Anything else the transport reports
    Other,
}

impl TransportErrorKind {
    /// Classify a reqwest error
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_status() {
            TransportErrorKind::Status
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else if err.is_request() || err.is_builder() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        }
    }

    /// Short label used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Status => "status",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Redirect => "redirect",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call as reported by the transport
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TransportError {
    /// What went wrong
    pub kind: TransportErrorKind,

    /// Human-readable description
    pub message: String,

    /// The request the failure belongs to
    pub config: RequestConfig,

    /// The response, when the server answered with an error status
    pub response: Option<ErrorResponse>,
}

impl TransportError {
    /// Create a failure that carries no response
    pub fn new(kind: TransportErrorKind, message: impl Into<String>, config: RequestConfig) -> Self {
        Self {
            kind,
            message: message.into(),
            config,
            response: None,
        }
    }

    /// Create a failure for a response with a non-success status
    pub fn status(config: RequestConfig, response: ErrorResponse) -> Self {
        Self {
            kind: TransportErrorKind::Status,
            message: format!("Request failed with status code {}", response.status),
            config,
            response: Some(response),
        }
    }

    /// Convert a reqwest error raised while issuing `config`
    pub fn from_reqwest(err: &reqwest::Error, config: RequestConfig) -> Self {
        let kind = TransportErrorKind::from_reqwest(err);
        let message = match kind {
            TransportErrorKind::Timeout => format!("Request timed out: {}", err),
            TransportErrorKind::Connect => format!("Connection error: {}", err),
            TransportErrorKind::Redirect => format!("Too many redirects: {}", err),
            TransportErrorKind::Body => format!("Response body error: {}", err),
            TransportErrorKind::Request => format!("Invalid request: {}", err),
            _ => format!("HTTP client error: {}", err),
        };

        Self::new(kind, message, config)
    }

    /// Status code of the received response, if any
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|response| response.status)
    }

    /// Whether a response arrived before the call failed
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}
