//! Sink backed by `tracing`

use tracing::{debug, error, info, trace, warn};

use super::{Severity, Sink};
use crate::record::LogRecord;

/// Sink that emits each record as a `tracing` event at the matching level
#[derive(Debug, Clone)]
pub struct TracingSink {
    context: String,
}

impl TracingSink {
    /// Create a tracing sink labeled with `context`
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

impl Sink for TracingSink {
    fn supports(&self, _severity: Severity) -> bool {
        true
    }

    fn log(&self, severity: Severity, record: &LogRecord, tag: &str) {
        let payload = serde_json::to_string(record).unwrap_or_default();
        let context = self.context.as_str();

        match severity {
            Severity::Trace => trace!(context, tag, record = %payload, "http exchange"),
            Severity::Debug => debug!(context, tag, record = %payload, "http exchange"),
            Severity::Info => info!(context, tag, record = %payload, "http exchange"),
            Severity::Warn => warn!(context, tag, record = %payload, "http exchange"),
            Severity::Error => error!(context, tag, record = %payload, "http exchange"),
        }
    }
}
