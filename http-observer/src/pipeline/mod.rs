//! Observation pipeline
//!
//! `Observer::observe` wraps a single call: it captures the request just
//! before dispatch, awaits the transport, builds one record for the outcome,
//! hands it to the sink and returns the outcome untouched.
//!
//! Per call the pipeline moves through `Started -> Succeeded | Failed ->
//! Logged`. Nothing is shared between calls except the sink and the
//! redaction settings, both read-only.
//!
//! Panics raised while building or emitting a record are caught with
//! `catch_unwind` and the record is dropped. The panic hook still fires.

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::error::TransportError;
use crate::record::{
    build_failure_record, build_success_record, FailureInfo, LogRecord, RequestDescriptor,
    ResponseDescriptor,
};
use crate::redaction::SensitiveKeys;
use crate::sink::{emit_with_fallback, Severity, Sink};
use crate::transport::{RequestConfig, ResponseEnvelope, Transport, TransportRequest};
use crate::util::{generate_call_id, measure_time_async};

/// Message tag for a completed request/response pair
pub const SUCCESS_TAG: &str = "http_request_response";

/// Message tag for a failed request
pub const FAILURE_TAG: &str = "http_request_response_error";

/// Levels tried, in order, for a successful call
pub const SUCCESS_CHAIN: [Severity; 2] = [Severity::Trace, Severity::Info];

/// Levels tried, in order, for a failed call
pub const FAILURE_CHAIN: [Severity; 2] = [Severity::Trace, Severity::Error];

/// Lifecycle of one observed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Request captured, transport not yet answered
    Started,

    /// Transport returned a response
    Succeeded,

    /// Transport returned a failure
    Failed,

    /// Record built and handed to the sink (or dropped)
    Logged,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "Started"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Logged => write!(f, "Logged"),
        }
    }
}

/// Result of handing a record to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Written at the given level
    Delivered(Severity),

    /// The sink supports none of the levels in the chain
    Unsupported,

    /// Building or emitting the record panicked; the record was dropped
    Dropped,
}

/// Wraps transport calls with request/response logging
#[derive(Clone)]
pub struct Observer {
    sink: Arc<dyn Sink>,
    redaction: Option<SensitiveKeys>,
}

impl Observer {
    /// Create an observer that redacts with the default key set
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self {
            sink,
            redaction: Some(SensitiveKeys::default()),
        }
    }

    /// Redact with a custom key set
    pub fn with_redaction(mut self, keys: SensitiveKeys) -> Self {
        self.redaction = Some(keys);
        self
    }

    /// Log bodies and headers verbatim
    pub fn without_redaction(mut self) -> Self {
        self.redaction = None;
        self
    }

    /// Key set applied to records, `None` when redaction is off
    pub fn redaction(&self) -> Option<&SensitiveKeys> {
        self.redaction.as_ref()
    }

    /// The sink records are written to
    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// Observe one call
    ///
    /// `call` must dispatch exactly the request described by `config`. Its
    /// outcome is returned unchanged; logging problems never surface as
    /// errors. A panic inside the sink is caught, but the process panic hook
    /// still runs and by default prints the message to stderr; install a
    /// custom hook with `std::panic::set_hook` to silence it.
    pub async fn observe<F>(
        &self,
        config: &RequestConfig,
        call: F,
    ) -> Result<ResponseEnvelope, TransportError>
    where
        F: Future<Output = Result<ResponseEnvelope, TransportError>>,
    {
        let call_id = generate_call_id();
        let request =
            panic::catch_unwind(AssertUnwindSafe(|| RequestDescriptor::capture(config))).ok();
        if request.is_none() {
            warn!("call {}: could not capture request, it will not be logged", call_id);
        }
        debug!("call {}: {} {} {}", call_id, CallState::Started, config.method, config.full_url());

        let (outcome, elapsed) = measure_time_async(call).await;

        let (state, emission) = match (&outcome, request) {
            (Ok(response), Some(request)) => (
                CallState::Succeeded,
                self.emit(SUCCESS_TAG, &SUCCESS_CHAIN, || {
                    build_success_record(
                        request,
                        ResponseDescriptor::from_envelope(response),
                        self.redaction.as_ref(),
                    )
                }),
            ),
            (Err(error), Some(request)) => (
                CallState::Failed,
                self.emit(FAILURE_TAG, &FAILURE_CHAIN, || {
                    build_failure_record(
                        request,
                        FailureInfo::from_error(error),
                        self.redaction.as_ref(),
                    )
                }),
            ),
            (Ok(_), None) => (CallState::Succeeded, Emission::Dropped),
            (Err(_), None) => (CallState::Failed, Emission::Dropped),
        };

        debug!(
            "call {}: {} after {:?}, {} ({:?})",
            call_id,
            state,
            elapsed,
            CallState::Logged,
            emission
        );

        outcome
    }

    /// Build a record and write it, absorbing any panic along the way
    fn emit<B>(&self, tag: &str, chain: &[Severity], build: B) -> Emission
    where
        B: FnOnce() -> LogRecord,
    {
        let sink = self.sink.as_ref();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let record = build();
            emit_with_fallback(sink, chain, &record, tag)
        }));

        match result {
            Ok(Some(severity)) => Emission::Delivered(severity),
            Ok(None) => Emission::Unsupported,
            Err(_) => {
                debug!("dropping {} record: building or emitting it panicked", tag);
                Emission::Dropped
            }
        }
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("redaction", &self.redaction)
            .finish_non_exhaustive()
    }
}

/// A transport with the observation pipeline in front of it
#[derive(Debug, Clone)]
pub struct ObservedTransport<T> {
    inner: T,
    observer: Observer,
}

impl<T: Transport> ObservedTransport<T> {
    /// Wrap `inner` with `observer`
    pub fn new(inner: T, observer: Observer) -> Self {
        Self { inner, observer }
    }

    /// The wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// The observer in front of the transport
    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

#[async_trait]
impl<T: Transport> Transport for ObservedTransport<T> {
    fn prepare(&self, request: TransportRequest) -> RequestConfig {
        self.inner.prepare(request)
    }

    async fn dispatch(&self, config: RequestConfig) -> Result<ResponseEnvelope, TransportError> {
        let call = self.inner.dispatch(config.clone());
        self.observer.observe(&config, call).await
    }
}
