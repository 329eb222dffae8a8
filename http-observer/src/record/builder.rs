//! Record assembly
//!
//! Redaction, when requested, is applied to the request body, request
//! headers, response body and response headers independently.

use serde_json::Value;

use super::{
    FailureDescriptor, FailureInfo, LogRecord, OrUnknown, RecordData, RequestDescriptor,
    ResponseDescriptor, ResponseSection,
};
use crate::redaction::{redact, SensitiveKeys};

/// Interpret a raw request body for logging
///
/// A string holding JSON is parsed; any other string, or a body that is
/// already structured, is returned as-is. An absent body becomes `null`.
pub fn parse_body(raw: Option<&Value>) -> Value {
    match raw {
        Some(Value::String(text)) => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
        }
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

/// Build the record for a call that succeeded
pub fn build_success_record(
    request: RequestDescriptor,
    response: ResponseDescriptor,
    redaction: Option<&SensitiveKeys>,
) -> LogRecord {
    let response = match redaction {
        Some(keys) => ResponseDescriptor {
            status_code: response.status_code,
            body: redact(&response.body, keys),
            headers: redact(&response.headers, keys),
        },
        None => response,
    };

    LogRecord {
        data: RecordData {
            request: redact_request(request, redaction),
            response: ResponseSection::Received(response),
        },
    }
}

/// Build the record for a call that failed
///
/// A failure carrying a complete response is logged like a response; missing
/// fields are filled with the `"unknown"` placeholder.
pub fn build_failure_record(
    request: RequestDescriptor,
    failure: FailureInfo,
    redaction: Option<&SensitiveKeys>,
) -> LogRecord {
    let scrub = |value: Value| match redaction {
        Some(keys) => redact(&value, keys),
        None => value,
    };

    let response = match failure {
        FailureInfo {
            status: Some(status),
            body: Some(body),
            headers: Some(headers),
        } => ResponseSection::Received(ResponseDescriptor {
            status_code: status,
            body: scrub(body),
            headers: scrub(headers),
        }),
        partial => ResponseSection::Failed(FailureDescriptor {
            status_code: partial.status.into(),
            body: OrUnknown::from(partial.body).map(scrub),
            headers: OrUnknown::from(partial.headers).map(scrub),
            duration: OrUnknown::Unknown,
        }),
    };

    LogRecord {
        data: RecordData {
            request: redact_request(request, redaction),
            response,
        },
    }
}

fn redact_request(request: RequestDescriptor, redaction: Option<&SensitiveKeys>) -> RequestDescriptor {
    match redaction {
        Some(keys) => RequestDescriptor {
            body: redact(&request.body, keys),
            headers: redact(&request.headers, keys),
            ..request
        },
        None => request,
    }
}
