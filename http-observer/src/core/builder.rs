//! Client builder implementation
//!
//! Fluent construction of `HttpClient`s: transport settings and observation
//! settings in one place.

use std::sync::Arc;
use std::time::Duration;

use crate::client::{HttpClient, HttpClientOptions};
use crate::config::ObserverConfig;
use crate::error::Result;
use crate::redaction::SensitiveKeys;
use crate::sink::Sink;
use crate::transport::{ReqwestTransport, Transport};

/// Unified builder for observed HTTP clients
#[derive(Debug, Clone, Default)]
pub struct HttpClientBuilder {
    options: HttpClientOptions,
}

impl HttpClientBuilder {
    /// Create a new client builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration
    pub fn from_config(config: &ObserverConfig) -> Self {
        Self {
            options: HttpClientOptions::from_config(config),
        }
    }

    /// Set the base URL for relative paths
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.options.transport.base_url = Some(url.into());
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.transport.headers.insert(key.into(), value.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.transport.timeout = Some(timeout);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.transport.user_agent = Some(user_agent.into());
        self
    }

    /// Enable or disable compression
    pub fn compression(mut self, enabled: bool) -> Self {
        self.options.transport.compression = enabled;
        self
    }

    /// Log records to `sink`
    pub fn logger<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.options.logger = Some(Arc::new(sink));
        self
    }

    /// Log records to a shared sink
    pub fn shared_logger(mut self, sink: Arc<dyn Sink>) -> Self {
        self.options.logger = Some(sink);
        self
    }

    /// Turn logging on or off explicitly
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.options.enable_logging = Some(enabled);
        self
    }

    /// Mask sensitive fields in records (on by default)
    pub fn remove_sensitive_data(mut self, enabled: bool) -> Self {
        self.options.remove_sensitive_data = enabled;
        self
    }

    /// Replace the sensitive field names
    pub fn sensitive_keys(mut self, keys: SensitiveKeys) -> Self {
        self.options.sensitive_keys = keys;
        self
    }

    /// Set the label for log lines
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.options.context = context.into();
        self
    }

    /// The options collected so far
    pub fn options(&self) -> &HttpClientOptions {
        &self.options
    }

    /// Build a client on a reqwest transport
    pub fn build(self) -> Result<HttpClient> {
        HttpClient::new(self.options)
    }

    /// Build a client on a custom transport
    pub fn build_with_transport<T: Transport + 'static>(self, transport: T) -> HttpClient<T> {
        HttpClient::with_transport(transport, self.options)
    }

    /// Build only the reqwest transport
    pub fn build_transport(&self) -> Result<ReqwestTransport> {
        ReqwestTransport::new(self.options.transport.clone())
    }
}
