//! Client options

use std::fmt;
use std::sync::Arc;

use crate::config::{ObserverConfig, DEFAULT_CONTEXT};
use crate::pipeline::Observer;
use crate::redaction::SensitiveKeys;
use crate::sink::{ConsoleSink, Sink};
use crate::transport::TransportConfig;

/// Settings for an `HttpClient`
#[derive(Clone)]
pub struct HttpClientOptions {
    /// Sink for records; a console sink is used when logging is on and this is unset
    pub logger: Option<Arc<dyn Sink>>,

    /// Logging switch; defaults to true iff `logger` is set
    pub enable_logging: Option<bool>,

    /// Mask sensitive fields in records
    pub remove_sensitive_data: bool,

    /// Label passed to the default sink; not part of the record
    pub context: String,

    /// Field names masked when `remove_sensitive_data` is on
    pub sensitive_keys: SensitiveKeys,

    /// Underlying transport settings
    pub transport: TransportConfig,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            logger: None,
            enable_logging: None,
            remove_sensitive_data: true,
            context: DEFAULT_CONTEXT.to_string(),
            sensitive_keys: SensitiveKeys::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl HttpClientOptions {
    /// Build options from a loaded configuration
    pub fn from_config(config: &ObserverConfig) -> Self {
        let transport = TransportConfig {
            base_url: config.base_url.clone(),
            timeout: Some(config.timeout()),
            ..TransportConfig::default()
        };

        Self {
            logger: None,
            enable_logging: config.enable_logging,
            remove_sensitive_data: config.remove_sensitive_data,
            context: config.context.clone(),
            sensitive_keys: config
                .sensitive_keys
                .as_ref()
                .map(|keys| SensitiveKeys::new(keys.iter().cloned()))
                .unwrap_or_default(),
            transport,
        }
    }

    /// Whether calls will be observed
    pub fn logging_enabled(&self) -> bool {
        self.enable_logging.unwrap_or(self.logger.is_some())
    }

    /// The sink calls will be logged to, if logging is enabled
    pub fn resolve_sink(&self) -> Option<Arc<dyn Sink>> {
        if !self.logging_enabled() {
            return None;
        }

        let sink = match self.logger {
            Some(ref logger) => Arc::clone(logger),
            None => Arc::new(ConsoleSink::new(self.context.clone())) as Arc<dyn Sink>,
        };
        Some(sink)
    }

    /// The observer to install, if logging is enabled
    pub fn observer(&self) -> Option<Observer> {
        self.resolve_sink().map(|sink| {
            let observer = Observer::new(sink);
            if self.remove_sensitive_data {
                observer.with_redaction(self.sensitive_keys.clone())
            } else {
                observer.without_redaction()
            }
        })
    }
}

impl fmt::Debug for HttpClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientOptions")
            .field("logger", &self.logger.as_ref().map(|_| "<sink>"))
            .field("enable_logging", &self.enable_logging)
            .field("remove_sensitive_data", &self.remove_sensitive_data)
            .field("context", &self.context)
            .field("sensitive_keys", &self.sensitive_keys)
            .field("transport", &self.transport)
            .finish()
    }
}
