//! Closure-based sink

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{Severity, Sink};
use crate::record::LogRecord;

type Handler = Arc<dyn Fn(&LogRecord, &str) + Send + Sync>;

/// Sink built from one closure per supported level
///
/// Levels without a closure are unsupported, so the pipeline falls back past
/// them.
///
/// ```
/// use http_observer::sink::{FnSink, Severity, Sink};
///
/// let sink = FnSink::new()
///     .trace(|record, tag| println!("[TRACE] {} {}", tag, record.request().url))
///     .error(|record, tag| eprintln!("[ERROR] {} {}", tag, record.request().url));
///
/// assert!(sink.supports(Severity::Trace));
/// assert!(!sink.supports(Severity::Info));
/// ```
#[derive(Clone, Default)]
pub struct FnSink {
    handlers: BTreeMap<Severity, Handler>,
}

impl FnSink {
    /// Create a sink with no levels
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle `severity` with `handler`
    pub fn on<F>(mut self, severity: Severity, handler: F) -> Self
    where
        F: Fn(&LogRecord, &str) + Send + Sync + 'static,
    {
        self.handlers.insert(severity, Arc::new(handler));
        self
    }

    pub fn trace<F>(self, handler: F) -> Self
    where
        F: Fn(&LogRecord, &str) + Send + Sync + 'static,
    {
        self.on(Severity::Trace, handler)
    }

    pub fn debug<F>(self, handler: F) -> Self
    where
        F: Fn(&LogRecord, &str) + Send + Sync + 'static,
    {
        self.on(Severity::Debug, handler)
    }

    pub fn info<F>(self, handler: F) -> Self
    where
        F: Fn(&LogRecord, &str) + Send + Sync + 'static,
    {
        self.on(Severity::Info, handler)
    }

    pub fn warn<F>(self, handler: F) -> Self
    where
        F: Fn(&LogRecord, &str) + Send + Sync + 'static,
    {
        self.on(Severity::Warn, handler)
    }

    pub fn error<F>(self, handler: F) -> Self
    where
        F: Fn(&LogRecord, &str) + Send + Sync + 'static,
    {
        self.on(Severity::Error, handler)
    }
}

impl Sink for FnSink {
    fn supports(&self, severity: Severity) -> bool {
        self.handlers.contains_key(&severity)
    }

    fn log(&self, severity: Severity, record: &LogRecord, tag: &str) {
        if let Some(handler) = self.handlers.get(&severity) {
            handler(record, tag);
        }
    }
}

impl fmt::Debug for FnSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSink")
            .field("levels", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
