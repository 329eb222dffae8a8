//! Test doubles shared by the test modules

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{TransportError, TransportErrorKind};
use crate::record::LogRecord;
use crate::sink::{Severity, Sink};
use crate::transport::{
    ErrorResponse, RequestConfig, ResponseEnvelope, StringMap, Transport, TransportRequest,
};

/// One call captured by `RecordingSink`
#[derive(Debug, Clone)]
pub struct Entry {
    pub severity: Severity,
    pub record: Value,
    pub tag: String,
}

/// Sink that keeps every record it receives
pub struct RecordingSink {
    levels: Vec<Severity>,
    entries: Mutex<Vec<Entry>>,
}

impl RecordingSink {
    /// Supports every level
    pub fn all() -> Self {
        Self::only(&Severity::ALL)
    }

    /// Supports only `levels`
    pub fn only(levels: &[Severity]) -> Self {
        Self {
            levels: levels.to_vec(),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn single(&self) -> Entry {
        let entries = self.entries();
        assert_eq!(entries.len(), 1, "expected exactly one record, got {:?}", entries);
        entries.into_iter().next().unwrap()
    }
}

impl Sink for RecordingSink {
    fn supports(&self, severity: Severity) -> bool {
        self.levels.contains(&severity)
    }

    fn log(&self, severity: Severity, record: &LogRecord, tag: &str) {
        self.entries.lock().unwrap().push(Entry {
            severity,
            record: serde_json::to_value(record).unwrap(),
            tag: tag.to_string(),
        });
    }
}

/// Sink that panics on every write
pub struct PanickingSink;

impl Sink for PanickingSink {
    fn supports(&self, _severity: Severity) -> bool {
        true
    }

    fn log(&self, _severity: Severity, _record: &LogRecord, _tag: &str) {
        panic!("sink exploded");
    }
}

type Responder = Box<dyn Fn(&RequestConfig) -> Result<ResponseEnvelope, TransportError> + Send + Sync>;

/// In-memory transport answering every call with a scripted outcome
pub struct ScriptedTransport {
    base_url: Option<String>,
    responder: Responder,
    calls: AtomicUsize,
}

pub const TEST_BASE_URL: &str = "http://api.test";

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RequestConfig) -> Result<ResponseEnvelope, TransportError> + Send + Sync + 'static,
    {
        Self {
            base_url: Some(TEST_BASE_URL.to_string()),
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer every call with `status` and `data`
    pub fn ok(status: u16, data: Value) -> Self {
        Self::new(move |config| {
            Ok(ResponseEnvelope {
                status,
                data: data.clone(),
                headers: response_headers(),
                config: config.clone(),
            })
        })
    }

    /// Fail every call with an error status carrying a response
    pub fn status_error(status: u16, data: Value) -> Self {
        Self::new(move |config| {
            Err(TransportError::status(
                config.clone(),
                ErrorResponse {
                    status,
                    data: data.clone(),
                    headers: response_headers(),
                },
            ))
        })
    }

    /// Fail every call before any response arrives
    pub fn unreachable() -> Self {
        Self::new(|config| {
            Err(TransportError::new(
                TransportErrorKind::Connect,
                "Connection error: connection refused",
                config.clone(),
            ))
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn prepare(&self, request: TransportRequest) -> RequestConfig {
        let mut headers = StringMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.extend(request.options.headers);

        RequestConfig {
            method: request.method,
            url: request.url,
            base_url: self.base_url.clone(),
            params: request.options.params,
            data: request.body,
            headers,
        }
    }

    async fn dispatch(&self, config: RequestConfig) -> Result<ResponseEnvelope, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        (self.responder)(&config)
    }
}

pub fn response_headers() -> StringMap {
    let mut headers = StringMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    headers
}

/// Response half of a record with every field unknown
pub fn unknown_response() -> Value {
    json!({
        "statusCode": "unknown",
        "body": "unknown",
        "headers": "unknown",
        "duration": "unknown"
    })
}
