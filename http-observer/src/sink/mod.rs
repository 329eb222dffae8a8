//! Logging sinks
//!
//! A sink is the pluggable destination for log records. Each severity level
//! is an independent, optional capability: a sink reports which levels it
//! supports and the pipeline walks a fixed fallback chain to pick one.
//!
//! - `ConsoleSink`: one line per record on stdout/stderr (the default)
//! - `TracingSink`: forwards records as `tracing` events
//! - `FnSink`: a closure per level, any subset of levels

mod closure;
mod console;
mod tracing_sink;

pub use closure::FnSink;
pub use console::ConsoleSink;
pub use tracing_sink::TracingSink;

use std::fmt;
use std::sync::Arc;

use crate::record::LogRecord;

/// Severity levels a sink may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// All levels, lowest first
    pub const ALL: [Severity; 5] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for log records
///
/// Implementations are side-effect only and must not panic; the pipeline
/// absorbs panics anyway, but a panicking sink loses the record.
pub trait Sink: Send + Sync {
    /// Whether this sink handles `severity`
    fn supports(&self, severity: Severity) -> bool;

    /// Write a record at `severity` with a message tag
    ///
    /// Only called for levels where `supports` returns true.
    fn log(&self, severity: Severity, record: &LogRecord, tag: &str);
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn supports(&self, severity: Severity) -> bool {
        (**self).supports(severity)
    }

    fn log(&self, severity: Severity, record: &LogRecord, tag: &str) {
        (**self).log(severity, record, tag)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn supports(&self, severity: Severity) -> bool {
        (**self).supports(severity)
    }

    fn log(&self, severity: Severity, record: &LogRecord, tag: &str) {
        (**self).log(severity, record, tag)
    }
}

/// Write `record` at the first level in `chain` the sink supports
///
/// Returns the level used, or `None` when the sink supports none of them.
pub fn emit_with_fallback(
    sink: &dyn Sink,
    chain: &[Severity],
    record: &LogRecord,
    tag: &str,
) -> Option<Severity> {
    let severity = chain.iter().copied().find(|level| sink.supports(*level))?;
    sink.log(severity, record, tag);
    Some(severity)
}
