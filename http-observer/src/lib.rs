//! # HTTP Observer
//!
//! Request/response observability for outbound HTTP calls in the Phoenix ORCH
//! project.
//!
//! This crate provides:
//!
//! - A client facade (`HttpClient`) with GET/POST/PUT/DELETE
//! - An observation pipeline that turns every call into one structured record
//! - Redaction of sensitive fields before records leave the process
//! - Pluggable logging sinks with per-level fallback
//!
//! ## Architecture
//!
//! - `Transport`: issues requests (`ReqwestTransport` by default)
//! - `Observer` / `ObservedTransport`: wraps a transport and logs each call
//! - `LogRecord`: `{ data: { request, response } }`, the only payload sinks see
//! - `Sink`: where records go (`ConsoleSink`, `TracingSink`, `FnSink`)
//! - `ClientError` / `TransportError`: error handling
//!
//! ```no_run
//! use http_observer::{ConsoleSink, HttpClient};
//! use serde_json::{json, Value};
//!
//! # async fn run() -> http_observer::Result<()> {
//! let client = HttpClient::builder()
//!     .base_url("https://jsonplaceholder.typicode.com")
//!     .logger(ConsoleSink::new("ApiClient"))
//!     .build()?;
//!
//! let post: Value = client.post("/posts", Some(json!({"title": "hello"})), None).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub use crate::core::{HttpClientBuilder, HttpExecutor};

pub mod client;
pub use client::{HttpClient, HttpClientOptions};

pub mod transport;
pub use transport::{
    ReqwestTransport, RequestConfig, RequestOptions, ResponseEnvelope, Transport, TransportConfig,
    TransportRequest,
};

pub mod pipeline;
pub use pipeline::{CallState, ObservedTransport, Observer, FAILURE_TAG, SUCCESS_TAG};

pub mod record;
pub use record::{LogRecord, RequestDescriptor, ResponseSection};

pub mod redaction;
pub use redaction::{redact, SensitiveKeys, REDACTED_MASK};

pub mod sink;
pub use sink::{ConsoleSink, FnSink, Severity, Sink, TracingSink};

pub mod error;
pub use error::{ClientError, Result, TransportError, TransportErrorKind};

pub mod config;
pub use config::{ConfigProvider, ObserverConfig, DEFAULT_CONTEXT};

mod util;

#[cfg(test)]
mod tests;

/// Create a new default client builder
pub fn client() -> HttpClientBuilder {
    HttpClientBuilder::new()
}
