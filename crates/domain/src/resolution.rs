use super::{DnsServer, DomainError, ErrorKind, RecordType};
use serde::Serialize;
use std::time::Duration;

/// Response payload kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawResponse {
    Wire(Vec<u8>),
    Json(serde_json::Value),
}

/// Outcome of a single `resolve` call.
///
/// Built only through [`ResolutionResult::success`] and
/// [`ResolutionResult::failure`]: a successful result always carries a
/// (possibly empty) answer list and no error, a failed one always carries an
/// error and no answer list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    success: bool,
    response_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    server: DnsServer,
    domain: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<RawResponse>,
}

impl ResolutionResult {
    pub fn success(
        server: &DnsServer,
        domain: &str,
        record_type: RecordType,
        answers: Vec<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            response_time_ms: duration_ms(elapsed),
            result: Some(answers),
            error: None,
            error_kind: None,
            server: server.clone(),
            domain: domain.to_string(),
            record_type: record_type.as_str().to_string(),
            method: None,
            raw_response: None,
        }
    }

    pub fn failure(
        server: &DnsServer,
        domain: &str,
        record_type: RecordType,
        error: &DomainError,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: false,
            response_time_ms: duration_ms(elapsed),
            result: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            server: server.clone(),
            domain: domain.to_string(),
            record_type: record_type.as_str().to_string(),
            method: None,
            raw_response: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_raw_response(mut self, raw: RawResponse) -> Self {
        self.raw_response = Some(raw);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn response_time_ms(&self) -> f64 {
        self.response_time_ms
    }

    pub fn answers(&self) -> Option<&[String]> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn server(&self) -> &DnsServer {
        &self.server
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn raw_response(&self) -> Option<&RawResponse> {
        self.raw_response.as_ref()
    }
}

fn duration_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
