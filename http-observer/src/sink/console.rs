//! Console sink

use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};

use super::{Severity, Sink};
use crate::record::LogRecord;

/// Sink that prints one line per record
///
/// Trace, debug and info go to stdout; warn and error go to stderr. Each line
/// reads `<timestamp> [LEVEL] [context] tag {json}`.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    context: String,
}

impl ConsoleSink {
    /// Create a console sink labeled with `context`
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }

    /// The label printed on every line
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Render the line for a record, without the timestamp
    pub fn render(&self, severity: Severity, record: &LogRecord, tag: &str) -> String {
        let payload = serde_json::to_string(record)
            .unwrap_or_else(|e| format!("{{\"unserializable\":\"{}\"}}", e));
        format!("[{}] [{}] {} {}", severity, self.context, tag, payload)
    }

    /// Write a timestamped line to `out`
    ///
    /// Write errors, such as a closed pipe, are dropped.
    pub fn write_line<W: Write>(
        &self,
        out: &mut W,
        severity: Severity,
        record: &LogRecord,
        tag: &str,
    ) {
        let _ = writeln!(
            out,
            "{} {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            self.render(severity, record, tag)
        );
    }
}

impl Sink for ConsoleSink {
    fn supports(&self, _severity: Severity) -> bool {
        true
    }

    fn log(&self, severity: Severity, record: &LogRecord, tag: &str) {
        match severity {
            Severity::Warn | Severity::Error => {
                self.write_line(&mut io::stderr().lock(), severity, record, tag)
            }
            _ => self.write_line(&mut io::stdout().lock(), severity, record, tag),
        }
    }
}
