//! Transport abstraction
//!
//! The observer does not talk to the network itself. It sits in front of a
//! `Transport`, which turns a `TransportRequest` into a `RequestConfig`
//! (resolving base URL and default headers) and then dispatches it.
//!
//! - `Transport`: the capability consumed by the pipeline and the client
//! - `ReqwestTransport`: the default implementation on top of `reqwest`
//! - `ObservedTransport` (in `crate::pipeline`): a transport wrapped with
//!   the observation pipeline

mod http;
pub use http::{build_http_client, ReqwestTransport, TransportConfig};

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::TransportError;

/// Header or query mapping, ordered for stable log output
pub type StringMap = BTreeMap<String, String>;

/// Per-request settings supplied by the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query string parameters
    pub params: Option<StringMap>,

    /// Extra headers, overriding the transport defaults
    pub headers: StringMap,
}

impl RequestOptions {
    /// Create empty request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(StringMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// A call as issued by the client facade, before transport defaults apply
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,

    /// Path relative to the base URL, or an absolute URL
    pub url: String,

    /// Request body; a string is sent verbatim, anything else as JSON
    pub body: Option<Value>,

    /// Per-request settings
    pub options: RequestOptions,
}

impl TransportRequest {
    /// Create a request without body or options
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    /// Attach a body
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach request options
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// A request resolved against the transport defaults, ready to dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    /// HTTP method
    pub method: Method,

    /// Path or absolute URL as the caller gave it
    pub url: String,

    /// Base URL of the transport, if one is configured
    pub base_url: Option<String>,

    /// Query string parameters
    pub params: Option<StringMap>,

    /// Raw request body
    pub data: Option<Value>,

    /// Effective request headers (defaults merged with per-request headers)
    pub headers: StringMap,
}

impl RequestConfig {
    /// Create a bare request config
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            base_url: None,
            params: None,
            data: None,
            headers: StringMap::new(),
        }
    }

    /// Absolute URL this request goes to
    pub fn full_url(&self) -> String {
        join_url(self.base_url.as_deref(), &self.url)
    }
}

/// A successful response together with the request it answers
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// HTTP status code
    pub status: u16,

    /// Decoded payload (JSON when parseable, otherwise text; null when empty)
    pub data: Value,

    /// Response headers
    pub headers: StringMap,

    /// The request this response belongs to
    pub config: RequestConfig,
}

/// The response attached to a failed call
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Decoded payload
    pub data: Value,

    /// Response headers
    pub headers: StringMap,
}

/// Capability set the observer requires from an HTTP transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Resolve a caller request against the transport defaults
    fn prepare(&self, request: TransportRequest) -> RequestConfig;

    /// Dispatch a prepared request
    async fn dispatch(&self, config: RequestConfig) -> Result<ResponseEnvelope, TransportError>;

    /// Prepare and dispatch in one step
    async fn send(&self, request: TransportRequest) -> Result<ResponseEnvelope, TransportError> {
        let config = self.prepare(request);
        self.dispatch(config).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn prepare(&self, request: TransportRequest) -> RequestConfig {
        (**self).prepare(request)
    }

    async fn dispatch(&self, config: RequestConfig) -> Result<ResponseEnvelope, TransportError> {
        (**self).dispatch(config).await
    }
}

/// Join a base URL and a path; absolute paths ignore the base
pub fn join_url(base: Option<&str>, path: &str) -> String {
    match base {
        Some(base) if !base.is_empty() && !is_absolute_url(path) => {
            if path.is_empty() {
                base.to_string()
            } else {
                format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
            }
        }
        _ => path.to_string(),
    }
}

/// Whether `candidate` is an absolute URL with a host
pub fn is_absolute_url(candidate: &str) -> bool {
    Url::parse(candidate).map(|url| url.has_host()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url(Some("http://api.test"), "/users"), "http://api.test/users");
        assert_eq!(join_url(Some("http://api.test/"), "users"), "http://api.test/users");
        assert_eq!(join_url(Some("http://api.test/v1/"), "/users"), "http://api.test/v1/users");
        assert_eq!(join_url(Some("http://api.test"), ""), "http://api.test");
        assert_eq!(join_url(None, "/users"), "/users");
        assert_eq!(join_url(Some(""), "/users"), "/users");
    }

    #[test]
    fn test_absolute_path_ignores_base() {
        assert_eq!(
            join_url(Some("http://api.test"), "https://other.test/posts/1"),
            "https://other.test/posts/1"
        );
        assert!(is_absolute_url("http://localhost:8080/x"));
        assert!(!is_absolute_url("/posts"));
        assert!(!is_absolute_url("localhost:8080/x"));
    }

    #[test]
    fn test_request_options_builder() {
        let options = RequestOptions::new()
            .param("page", "2")
            .header("x-trace", "abc");

        assert_eq!(options.params.unwrap().get("page").map(String::as_str), Some("2"));
        assert_eq!(options.headers.get("x-trace").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_request_config_full_url() {
        let mut config = RequestConfig::new(Method::GET, "/posts/1");
        assert_eq!(config.full_url(), "/posts/1");

        config.base_url = Some("https://jsonplaceholder.typicode.com".to_string());
        assert_eq!(config.full_url(), "https://jsonplaceholder.typicode.com/posts/1");
    }
}
