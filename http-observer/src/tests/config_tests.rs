//! Tests for configuration management functionality
//!
//! These tests verify that providers feed `ObserverConfig` correctly and that
//! loaded configuration turns into the expected client options.

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::client::HttpClientOptions;
    use crate::config::{
        ConfigProvider, ConfigProviderExt, EnvConfigProvider, MemoryConfigProvider, ObserverConfig,
        ServiceConfig, DEFAULT_CONTEXT,
    };
    use crate::core::HttpClientBuilder;
    use crate::error::ClientError;
    use crate::sink::Severity;
    use crate::tests::support::RecordingSink;

    fn provider_with(values: &[(&str, &str)]) -> MemoryConfigProvider {
        let mut provider = MemoryConfigProvider::new();
        for (key, value) in values {
            provider.set(*key, value);
        }
        provider
    }

    #[test]
    fn test_empty_provider_gives_defaults() {
        let config = ObserverConfig::from_provider(&MemoryConfigProvider::new()).unwrap();
        assert_eq!(config, ObserverConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_memory_provider_into_config() {
        let provider = provider_with(&[
            ("http_observer_base_url", "https://api.example.com"),
            ("http_observer_timeout_seconds", "5"),
            ("http_observer_enable_logging", "yes"),
            ("http_observer_remove_sensitive_data", "false"),
            ("http_observer_context", "ApiClient"),
            ("http_observer_sensitive_keys", "password, session_id"),
        ]);

        let config = ObserverConfig::from_provider(&provider).unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.enable_logging, Some(true));
        assert!(!config.remove_sensitive_data);
        assert_eq!(config.context, "ApiClient");
        assert_eq!(
            config.sensitive_keys,
            Some(vec!["password".to_string(), "session_id".to_string()])
        );
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let bad_bool = provider_with(&[("http_observer_enable_logging", "sometimes")]);
        let err = ObserverConfig::from_provider(&bad_bool).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));

        let bad_int = provider_with(&[("http_observer_timeout_seconds", "soon")]);
        let err = ObserverConfig::from_provider(&bad_int).unwrap_err();
        assert!(err.to_string().contains("http_observer_timeout_seconds"));
    }

    #[test]
    fn test_validation_failures() {
        let zero_timeout = provider_with(&[("http_observer_timeout_seconds", "0")]);
        assert!(ObserverConfig::from_provider(&zero_timeout).is_err());

        let relative_base = provider_with(&[("http_observer_base_url", "/api")]);
        let err = ObserverConfig::from_provider(&relative_base).unwrap_err();
        assert!(err.to_string().contains("Base URL must be absolute"));

        let config = ObserverConfig {
            context: "  ".to_string(),
            ..ObserverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_helpers() {
        let provider = provider_with(&[("flag", "OFF"), ("count", " 12 ")]);

        assert!(!provider.get_bool("flag").unwrap());
        assert_eq!(provider.get_int("count").unwrap(), 12);
        assert_eq!(provider.get_string_or("missing", "fallback"), "fallback");
        assert_eq!(provider.get_optional("missing", |p, k| p.get_int(k)).unwrap(), None);
        assert!(provider.get_optional("flag", |p, k| p.get_int(k)).is_err());
    }

    #[test]
    fn test_env_provider_into_config() {
        env::set_var("OBSTEST_HTTP_OBSERVER_CONTEXT", "EnvClient");
        env::set_var("OBSTEST_HTTP_OBSERVER_TIMEOUT_SECONDS", "7");

        let provider = EnvConfigProvider::new().with_prefix("OBSTEST");
        assert_eq!(provider.get_string("http_observer_context").unwrap(), "EnvClient");

        let config = ObserverConfig::from_provider(&provider).unwrap();
        assert_eq!(config.context, "EnvClient");
        assert_eq!(config.timeout_seconds, 7);
        assert_eq!(config.base_url, None);

        env::remove_var("OBSTEST_HTTP_OBSERVER_CONTEXT");
        env::remove_var("OBSTEST_HTTP_OBSERVER_TIMEOUT_SECONDS");

        assert!(provider.get_string("http_observer_context").is_err());
    }

    #[test]
    fn test_options_from_config() {
        let config = ObserverConfig {
            base_url: Some("https://api.example.com".to_string()),
            timeout_seconds: 3,
            enable_logging: Some(true),
            remove_sensitive_data: true,
            context: "Configured".to_string(),
            sensitive_keys: Some(vec!["session_id".to_string()]),
        };

        let options = HttpClientOptions::from_config(&config);

        assert_eq!(options.transport.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(options.transport.timeout, Some(Duration::from_secs(3)));
        assert_eq!(options.context, "Configured");
        assert!(options.logging_enabled());
        assert!(options.sensitive_keys.contains("session_id"));
        assert!(!options.sensitive_keys.contains("password"));

        let observer = options.observer().unwrap();
        assert_eq!(observer.redaction().map(|keys| keys.len()), Some(1));
    }

    #[test]
    fn test_default_options_do_not_log() {
        let options = HttpClientOptions::default();

        assert_eq!(options.context, DEFAULT_CONTEXT);
        assert!(options.remove_sensitive_data);
        assert!(!options.logging_enabled());
        assert!(options.resolve_sink().is_none());
        assert!(options.observer().is_none());
    }

    #[test]
    fn test_logger_implies_logging_unless_disabled() {
        let sink = Arc::new(RecordingSink::only(&[Severity::Info]));

        let mut options = HttpClientOptions {
            logger: Some(sink),
            ..HttpClientOptions::default()
        };
        assert!(options.logging_enabled());

        options.enable_logging = Some(false);
        assert!(!options.logging_enabled());
        assert!(options.observer().is_none());
    }

    #[test]
    fn test_explicit_logging_without_logger_uses_console() {
        let options = HttpClientOptions {
            enable_logging: Some(true),
            ..HttpClientOptions::default()
        };

        let sink = options.resolve_sink().unwrap();
        assert!(Severity::ALL.iter().all(|level| sink.supports(*level)));
    }

    #[test]
    fn test_builder_from_config() {
        let config = ObserverConfig {
            remove_sensitive_data: false,
            ..ObserverConfig::default()
        };

        let builder = HttpClientBuilder::from_config(&config).enable_logging(true);
        let observer = builder.options().observer().unwrap();
        assert!(observer.redaction().is_none());

        let client = builder.build().unwrap();
        assert!(client.is_logging_enabled());
        assert_eq!(client.context(), DEFAULT_CONTEXT);
    }
}
