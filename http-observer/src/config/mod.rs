//! Configuration management for observed clients
//!
//! Key/value providers (environment variables or in-memory maps) feed an
//! `ObserverConfig`, which the client turns into `HttpClientOptions`.

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;

use crate::error::{ClientError, Result};
use crate::transport::is_absolute_url;

/// Default label for a client's log lines
pub const DEFAULT_CONTEXT: &str = "HttpClient";

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value
            .trim()
            .parse::<i64>()
            .map_err(|e| ClientError::configuration(format!("Invalid integer for key {}: {}", key, e)))
    }

    /// Get a boolean configuration value
    fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key)?;
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(ClientError::configuration(format!(
                "Invalid boolean value for key {}: {}",
                key, value
            ))),
        }
    }

    /// Get a comma-separated list; blank entries are skipped
    fn get_list(&self, key: &str) -> Result<Vec<String>> {
        let value = self.get_string(key)?;
        Ok(value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get an optional value; a present but malformed value is an error
    fn get_optional<T>(&self, key: &str, read: impl FnOnce(&Self, &str) -> Result<T>) -> Result<Option<T>> {
        match self.get_string(key) {
            Ok(_) => read(self, key).map(Some),
            Err(_) => Ok(None),
        }
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,

    /// Optional namespace for variables
    namespace: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set a namespace for environment variables
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        if let Some(ref namespace) = self.namespace {
            env_key.push_str(namespace);
            env_key.push('_');
        }

        // Uppercase, non-alphanumerics become underscores
        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                ClientError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => ClientError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ClientError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// Global default configuration provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new().with_prefix("PHOENIX")));

/// Trait for validated configuration sections
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;
}

/// Observer and transport settings as read from a provider
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    /// Base URL for relative request paths
    pub base_url: Option<String>,

    /// Timeout in seconds
    pub timeout_seconds: u64,

    /// Explicit logging switch; unset means "log iff a logger is supplied"
    pub enable_logging: Option<bool>,

    /// Mask sensitive fields in records
    pub remove_sensitive_data: bool,

    /// Label for log lines
    pub context: String,

    /// Custom sensitive field names; unset keeps the defaults
    pub sensitive_keys: Option<Vec<String>>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: 30,
            enable_logging: None,
            remove_sensitive_data: true,
            context: DEFAULT_CONTEXT.to_string(),
            sensitive_keys: None,
        }
    }
}

impl ObserverConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let defaults = Self::default();

        let base_url = provider.get_string("http_observer_base_url").ok();
        let timeout_seconds = provider
            .get_optional("http_observer_timeout_seconds", |p, k| p.get_int(k))?
            .map(|seconds| seconds.max(0) as u64)
            .unwrap_or(defaults.timeout_seconds);
        let enable_logging =
            provider.get_optional("http_observer_enable_logging", |p, k| p.get_bool(k))?;
        let remove_sensitive_data = provider
            .get_optional("http_observer_remove_sensitive_data", |p, k| p.get_bool(k))?
            .unwrap_or(defaults.remove_sensitive_data);
        let context = provider.get_string_or("http_observer_context", &defaults.context);
        let sensitive_keys =
            provider.get_optional("http_observer_sensitive_keys", |p, k| p.get_list(k))?;

        let config = Self {
            base_url,
            timeout_seconds,
            enable_logging,
            remove_sensitive_data,
            context,
            sensitive_keys,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `PHOENIX_HTTP_OBSERVER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&**DEFAULT_PROVIDER)
    }

    /// Timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl ServiceConfig for ObserverConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(ClientError::configuration("Timeout must be greater than zero"));
        }

        if self.context.trim().is_empty() {
            return Err(ClientError::configuration("Logging context cannot be empty"));
        }

        if let Some(ref base_url) = self.base_url {
            if !is_absolute_url(base_url) {
                return Err(ClientError::configuration(format!(
                    "Base URL must be absolute: {}",
                    base_url
                )));
            }
        }

        Ok(())
    }
}
