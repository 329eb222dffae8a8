//! Structured log records
//!
//! A `LogRecord` is the single payload shape handed to a sink:
//!
//! ```json
//! { "data": { "request": { ... }, "response": { ... } } }
//! ```
//!
//! The response half is either a full `ResponseDescriptor` or, when the call
//! failed without a complete response, a `FailureDescriptor` whose missing
//! fields hold the literal `"unknown"`.

mod builder;
pub use builder::{build_failure_record, build_success_record, parse_body};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::TransportError;
use crate::transport::{RequestConfig, ResponseEnvelope, StringMap};

/// Placeholder written for data the failure did not carry
pub const UNKNOWN: &str = "unknown";

/// A value that is either known or the `"unknown"` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum OrUnknown<T> {
    /// The value was available
    Known(T),

    /// The value was not available
    Unknown,
}

impl<T> OrUnknown<T> {
    /// Whether the value is the placeholder
    pub fn is_unknown(&self) -> bool {
        matches!(self, OrUnknown::Unknown)
    }

    /// Borrow the known value
    pub fn known(&self) -> Option<&T> {
        match self {
            OrUnknown::Known(value) => Some(value),
            OrUnknown::Unknown => None,
        }
    }

    /// Map the known value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OrUnknown<U> {
        match self {
            OrUnknown::Known(value) => OrUnknown::Known(f(value)),
            OrUnknown::Unknown => OrUnknown::Unknown,
        }
    }
}

impl<T> From<Option<T>> for OrUnknown<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => OrUnknown::Known(value),
            None => OrUnknown::Unknown,
        }
    }
}

impl<T: Serialize> Serialize for OrUnknown<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OrUnknown::Known(value) => value.serialize(serializer),
            OrUnknown::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

/// Snapshot of an outgoing request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    /// HTTP method, lower-case
    pub method: String,

    /// Absolute URL (base URL joined with the path)
    pub url: String,

    /// Query string parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Request body, parsed from its serialized form when possible
    pub body: Value,

    /// Request headers
    pub headers: Value,

    /// Base URL the transport was configured with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl RequestDescriptor {
    /// Capture a prepared request
    pub fn capture(config: &RequestConfig) -> Self {
        Self {
            method: config.method.as_str().to_ascii_lowercase(),
            url: config.full_url(),
            params: config.params.as_ref().map(map_to_value),
            body: parse_body(config.data.as_ref()),
            headers: map_to_value(&config.headers),
            base_url: config.base_url.clone(),
        }
    }
}

/// A response that arrived
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDescriptor {
    /// HTTP status code
    pub status_code: u16,

    /// Response payload
    pub body: Value,

    /// Response headers
    pub headers: Value,
}

impl ResponseDescriptor {
    /// Describe a successful response
    pub fn from_envelope(envelope: &ResponseEnvelope) -> Self {
        Self {
            status_code: envelope.status,
            body: envelope.data.clone(),
            headers: map_to_value(&envelope.headers),
        }
    }
}

/// Response half of a failed call without a complete response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDescriptor {
    /// HTTP status code
    pub status_code: OrUnknown<u16>,

    /// Response payload
    pub body: OrUnknown<Value>,

    /// Response headers
    pub headers: OrUnknown<Value>,

    /// Call duration; never measured for failures
    pub duration: OrUnknown<u64>,
}

/// Whatever a failure carried about the response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureInfo {
    /// HTTP status code
    pub status: Option<u16>,

    /// Response payload
    pub body: Option<Value>,

    /// Response headers
    pub headers: Option<Value>,
}

impl FailureInfo {
    /// No response information at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Extract the response information a transport error carries
    pub fn from_error(error: &TransportError) -> Self {
        match error.response {
            Some(ref response) => Self {
                status: Some(response.status),
                body: Some(response.data.clone()),
                headers: Some(map_to_value(&response.headers)),
            },
            None => Self::none(),
        }
    }

    /// Whether status, body and headers are all present
    pub fn is_complete(&self) -> bool {
        self.status.is_some() && self.body.is_some() && self.headers.is_some()
    }
}

/// Response half of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseSection {
    /// A response arrived
    Received(ResponseDescriptor),

    /// No complete response was available
    Failed(FailureDescriptor),
}

impl ResponseSection {
    /// Status code, if known
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ResponseSection::Received(response) => Some(response.status_code),
            ResponseSection::Failed(failure) => failure.status_code.known().copied(),
        }
    }
}

/// Request/response pair of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordData {
    /// The request
    pub request: RequestDescriptor,

    /// The response or failure
    pub response: ResponseSection,
}

/// The payload handed to a sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// Record contents
    pub data: RecordData,
}

impl LogRecord {
    /// The request half
    pub fn request(&self) -> &RequestDescriptor {
        &self.data.request
    }

    /// The response half
    pub fn response(&self) -> &ResponseSection {
        &self.data.response
    }

    /// Render the record as a JSON value
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Convert a string map into a JSON object
pub(crate) fn map_to_value(map: &StringMap) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect::<Map<String, Value>>(),
    )
}
