//! reqwest-backed transport
//!
//! Default headers are kept on the transport rather than on the reqwest
//! client so that every prepared `RequestConfig` shows the headers that
//! actually go on the wire.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use super::{
    ErrorResponse, RequestConfig, ResponseEnvelope, StringMap, Transport, TransportRequest,
};
use crate::error::{ClientError, Result, TransportError, TransportErrorKind};

/// Default user agent string
const DEFAULT_USER_AGENT: &str = "Phoenix-ORCH/0.1.0 (http-observer)";

/// Settings for the underlying HTTP transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Base URL prepended to relative request paths
    pub base_url: Option<String>,

    /// Request timeout
    pub timeout: Option<Duration>,

    /// Headers sent with every request
    pub headers: StringMap,

    /// User agent
    pub user_agent: Option<String>,

    /// Accept gzip-compressed responses
    pub compression: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Some(Duration::from_secs(30)), // Default 30s timeout
            headers: StringMap::new(),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            compression: true,
        }
    }
}

/// Build a reqwest client from transport settings
pub fn build_http_client(config: &TransportConfig) -> Result<Client> {
    let mut builder = Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(ref user_agent) = config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder = builder.gzip(config.compression);

    builder
        .build()
        .map_err(|e| ClientError::configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Transport that issues requests through a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Create a transport, validating the default headers
    pub fn new(config: TransportConfig) -> Result<Self> {
        to_header_map(&config.headers).map_err(ClientError::configuration)?;
        let client = build_http_client(&config)?;

        Ok(Self { client, config })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client, config: TransportConfig) -> Self {
        Self { client, config }
    }

    /// The underlying reqwest client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Transport settings
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn prepare(&self, request: TransportRequest) -> RequestConfig {
        let mut headers = StringMap::new();
        for (key, value) in self.config.headers.iter() {
            merge_header(&mut headers, key.clone(), value.clone());
        }
        for (key, value) in request.options.headers {
            merge_header(&mut headers, key, value);
        }

        // Structured bodies go out as JSON
        let typed = headers
            .keys()
            .any(|key| key.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
        if !typed && matches!(&request.body, Some(body) if !body.is_string() && !body.is_null()) {
            headers.insert(CONTENT_TYPE.as_str().to_string(), "application/json".to_string());
        }

        RequestConfig {
            method: request.method,
            url: request.url,
            base_url: self.config.base_url.clone(),
            params: request.options.params,
            data: request.body,
            headers,
        }
    }

    async fn dispatch(&self, config: RequestConfig) -> std::result::Result<ResponseEnvelope, TransportError> {
        let headers = match to_header_map(&config.headers) {
            Ok(headers) => headers,
            Err(message) => {
                return Err(TransportError::new(TransportErrorKind::Request, message, config));
            }
        };

        let mut builder = self
            .client
            .request(config.method.clone(), config.full_url())
            .headers(headers);

        if let Some(ref params) = config.params {
            builder = builder.query(params);
        }

        builder = match config.data {
            Some(Value::String(ref raw)) => builder.body(raw.clone()),
            Some(Value::Null) | None => builder,
            Some(ref body) => builder.body(body.to_string()),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Err(TransportError::from_reqwest(&e, config)),
        };

        let status = response.status();
        let response_headers = from_header_map(response.headers());
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(TransportError::from_reqwest(&e, config)),
        };
        let data = decode_body(&bytes);

        if status.is_success() {
            Ok(ResponseEnvelope {
                status: status.as_u16(),
                data,
                headers: response_headers,
                config,
            })
        } else {
            Err(TransportError::status(
                config,
                ErrorResponse {
                    status: status.as_u16(),
                    data,
                    headers: response_headers,
                },
            ))
        }
    }
}

/// Insert a header, replacing any existing entry whose name differs only in case
///
/// The caller's spelling of the name is kept so that logged headers match
/// what was configured.
fn merge_header(headers: &mut StringMap, key: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
    headers.insert(key, value);
}

/// Convert a string map into reqwest headers
fn to_header_map(headers: &StringMap) -> std::result::Result<HeaderMap, String> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_str(key)
            .map_err(|e| format!("Invalid header name {}: {}", key, e))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| format!("Invalid header value for {}: {}", key, e))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Flatten reqwest headers into a string map; repeated headers are comma-joined
fn from_header_map(headers: &HeaderMap) -> StringMap {
    let mut map = StringMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match map.get_mut(name.as_str()) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                map.insert(name.as_str().to_string(), value);
            }
        }
    }
    map
}

/// Decode a response body: JSON when possible, text otherwise, null when empty
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::json;

    fn transport(base_url: Option<&str>) -> ReqwestTransport {
        let mut config = TransportConfig {
            base_url: base_url.map(str::to_string),
            ..TransportConfig::default()
        };
        config.headers.insert("X-Client".to_string(), "observer".to_string());
        ReqwestTransport::new(config).unwrap()
    }

    #[test]
    fn test_prepare_merges_headers() {
        let transport = transport(Some("http://api.test"));
        let request = TransportRequest::new(Method::POST, "/login")
            .body(json!({"username": "u"}))
            .options(crate::transport::RequestOptions::new().header("X-Client", "override"));

        let config = transport.prepare(request);

        assert_eq!(config.base_url.as_deref(), Some("http://api.test"));
        assert_eq!(config.headers.get("X-Client").map(String::as_str), Some("override"));
        assert_eq!(config.headers.len(), 2);
        assert_eq!(
            config.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(config.full_url(), "http://api.test/login");
    }

    #[test]
    fn test_prepare_keeps_caller_header_case() {
        let transport = transport(None);
        let request = TransportRequest::new(Method::POST, "http://api.test/upload")
            .body(json!({"a": 1}))
            .options(
                crate::transport::RequestOptions::new()
                    .header("x-client", "lower")
                    .header("Content-Type", "application/merge-patch+json")
                    .header("X-Api-Key", "sk-live-123"),
            );

        let config = transport.prepare(request);

        assert_eq!(config.headers.get("x-client").map(String::as_str), Some("lower"));
        assert!(!config.headers.contains_key("X-Client"));
        assert_eq!(
            config.headers.get("Content-Type").map(String::as_str),
            Some("application/merge-patch+json")
        );
        assert!(!config.headers.contains_key("content-type"));
        assert_eq!(config.headers.get("X-Api-Key").map(String::as_str), Some("sk-live-123"));
        assert!(to_header_map(&config.headers).is_ok());
    }

    #[test]
    fn test_prepare_leaves_string_body_untyped() {
        let transport = transport(None);
        let config = transport.prepare(
            TransportRequest::new(Method::PUT, "http://api.test/raw").body(json!("not json")),
        );

        assert!(!config.headers.contains_key("content-type"));
        assert_eq!(config.data, Some(json!("not json")));
    }

    #[test]
    fn test_invalid_default_header_is_rejected() {
        let mut config = TransportConfig::default();
        config.headers.insert("bad header".to_string(), "x".to_string());

        let err = ReqwestTransport::new(config).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(br#"{"id":1}"#), json!({"id": 1}));
        assert_eq!(decode_body(b"plain text"), json!("plain text"));
    }

    #[test]
    fn test_from_header_map_joins_repeats() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));

        let map = from_header_map(&headers);
        assert_eq!(map.get("set-cookie").map(String::as_str), Some("a=1, b=2"));
    }
}
