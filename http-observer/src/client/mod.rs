//! Client facade
//!
//! `HttpClient` exposes GET/POST/PUT/DELETE, decodes the payload of a
//! successful response and hands transport failures back unchanged. When
//! logging is enabled every call goes through an `ObservedTransport`.

mod options;
pub use options::HttpClientOptions;

use std::fmt;
use std::sync::Arc;

use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::HttpClientBuilder;
use crate::error::{ClientError, Result};
use crate::pipeline::ObservedTransport;
use crate::transport::{ReqwestTransport, RequestOptions, Transport, TransportRequest};

/// HTTP client with optional request/response observation
pub struct HttpClient<T: Transport + 'static = ReqwestTransport> {
    /// Transport without observation
    raw: Arc<T>,

    /// Transport every facade call goes through
    active: Arc<dyn Transport>,

    logging_enabled: bool,

    context: String,
}

impl HttpClient<ReqwestTransport> {
    /// Create a client on a reqwest transport
    pub fn new(options: HttpClientOptions) -> Result<Self> {
        let transport = ReqwestTransport::new(options.transport.clone())?;
        Ok(Self::with_transport(transport, options))
    }

    /// Start building a client
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }
}

impl<T: Transport + 'static> HttpClient<T> {
    /// Create a client on a custom transport
    ///
    /// `options.transport` is ignored; `transport` is used as configured.
    pub fn with_transport(transport: T, options: HttpClientOptions) -> Self {
        let raw = Arc::new(transport);
        let observer = options.observer();
        let logging_enabled = observer.is_some();

        let active: Arc<dyn Transport> = match observer {
            Some(observer) => Arc::new(ObservedTransport::new(Arc::clone(&raw), observer)),
            None => Arc::clone(&raw) as Arc<dyn Transport>,
        };

        debug!(
            "{}: client ready, logging {}",
            options.context,
            if logging_enabled { "enabled" } else { "disabled" }
        );

        Self {
            raw,
            active,
            logging_enabled,
            context: options.context,
        }
    }

    /// Execute a GET request
    pub async fn get<R>(&self, url: &str, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::GET, url, None, options).await
    }

    /// Execute a POST request
    pub async fn post<R>(&self, url: &str, body: Option<Value>, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::POST, url, body, options).await
    }

    /// Execute a PUT request
    pub async fn put<R>(&self, url: &str, body: Option<Value>, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::PUT, url, body, options).await
    }

    /// Execute a DELETE request
    pub async fn delete<R>(&self, url: &str, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::DELETE, url, None, options).await
    }

    /// Execute a request with any method and decode the payload
    pub async fn request<R>(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let request = TransportRequest {
            method,
            url: url.to_string(),
            body,
            options: options.unwrap_or_default(),
        };

        let envelope = self.active.send(request).await?;

        serde_json::from_value(envelope.data)
            .map_err(|e| ClientError::decode(format!("Failed to decode response from {}: {}", url, e)))
    }

    /// The underlying transport; calls made on it are not observed
    pub fn raw_transport(&self) -> &Arc<T> {
        &self.raw
    }

    /// Whether calls are observed
    pub fn is_logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Label used for this client's log lines
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl<T: Transport + 'static> fmt::Debug for HttpClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("context", &self.context)
            .field("logging_enabled", &self.logging_enabled)
            .finish_non_exhaustive()
    }
}
