//! DNS-over-HTTPS (RFC 8484) with content negotiation.
//!
//! POST carries the wire-format query (`application/dns-message`); GET sends
//! `name`/`type` query parameters. Either may come back as a DNS message or
//! as a JSON document, and the `Content-Type` decides how it is decoded. When
//! the preferred method fails, the other one is tried once with whatever is
//! left of the same deadline.
//!
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use super::providers::preference_for;
use super::TransportAnswer;
use crate::dns::wire::WireCodec;
use bytes::Bytes;
use dnsbench_domain::{
    DnsQuery, DnsServer, DohFormat, DohMethod, DomainError, EngineConfig, RawResponse, RecordType,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Shared client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .use_rustls_tls()
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// RFC 8484 §6 media type
const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";
const DNS_JSON_CONTENT_TYPE: &str = "application/dns-json";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpsTransport;

impl HttpsTransport {
    pub async fn query(
        &self,
        query: &DnsQuery,
        server: &DnsServer,
        config: &EngineConfig,
    ) -> Result<TransportAnswer, DomainError> {
        let (method, format) = preference_for(server);
        let budget = Budget::new(config.timeout());
        let body = WireCodec::encode(query)?;

        match self.attempt(method, format, query, &body, server, &budget).await {
            Ok(answer) => Ok(answer.with_method(method)),
            Err(primary) => {
                let fallback = method.opposite();
                if budget.remaining().is_zero() {
                    debug!(
                        server = %server.name,
                        method = %method,
                        error = %primary,
                        "DoH attempt failed with no time left for the other method"
                    );
                    return Err(primary);
                }
                debug!(
                    server = %server.name,
                    method = %method,
                    fallback = %fallback,
                    remaining_ms = budget.remaining().as_millis() as u64,
                    error = %primary,
                    "DoH attempt failed, trying the other method"
                );
                self.attempt(fallback, format, query, &body, server, &budget)
                    .await
                    .map(|answer| answer.with_method(fallback))
            }
        }
    }

    async fn attempt(
        &self,
        method: DohMethod,
        format: DohFormat,
        query: &DnsQuery,
        body: &[u8],
        server: &DnsServer,
        budget: &Budget,
    ) -> Result<TransportAnswer, DomainError> {
        let timeout = budget.timeout;
        let remaining = budget.remaining();
        let url = request_url(&server.address, method, query)?;
        let context = format!("DoH {} {}", method, url);

        let request = match method {
            DohMethod::Get => SHARED_CLIENT
                .get(url)
                .header(ACCEPT, accept_for(format)),
            DohMethod::Post => SHARED_CLIENT
                .post(url)
                .header(CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
                .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
                .body(body.to_vec()),
        }
        .timeout(remaining);

        debug!(server = %server.name, request = %context, "Sending DoH query");

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| map_request_error(e, &context, timeout))?;

            let status = response.status();
            if !status.is_success() {
                return Err(DomainError::Http(format!(
                    "{} returned HTTP {}: {}",
                    context,
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )));
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(media_type)
                .unwrap_or_default();

            let body: Bytes = response
                .bytes()
                .await
                .map_err(|e| map_request_error(e, &context, timeout))?;

            debug!(
                request = %context,
                content_type = %content_type,
                response_len = body.len(),
                "DoH response received"
            );

            decode_body(&content_type, &body, query.record_type)
        };

        tokio::time::timeout(remaining, exchange)
            .await
            .map_err(|_| DomainError::timeout(context.as_str(), timeout))?
    }
}

/// One deadline shared by the preferred attempt and its fallback.
#[derive(Debug, Clone, Copy)]
struct Budget {
    timeout: Duration,
    deadline: Instant,
}

impl Budget {
    fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: Instant::now() + timeout,
        }
    }

    fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

fn request_url(
    address: &str,
    method: DohMethod,
    query: &DnsQuery,
) -> Result<reqwest::Url, DomainError> {
    let mut url = reqwest::Url::parse(address.trim()).map_err(|e| {
        DomainError::InvalidServer(format!("Invalid DoH URL '{}': {}", address, e))
    })?;

    match method {
        DohMethod::Get => {
            url.query_pairs_mut()
                .append_pair("name", &query.domain)
                .append_pair("type", query.record_type.as_str());
        }
        DohMethod::Post => {
            if !url.path().contains("/dns-query") {
                let path = format!("{}/dns-query", url.path().trim_end_matches('/'));
                url.set_path(&path);
            }
        }
    }

    Ok(url)
}

fn accept_for(format: DohFormat) -> &'static str {
    match format {
        DohFormat::Json => DNS_JSON_CONTENT_TYPE,
        DohFormat::WireFormat => DNS_MESSAGE_CONTENT_TYPE,
    }
}

fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn map_request_error(e: reqwest::Error, context: &str, timeout: Duration) -> DomainError {
    if e.is_timeout() {
        DomainError::timeout(context, timeout)
    } else if e.is_connect() {
        DomainError::Connection(format!("{}: {}", context, e))
    } else {
        DomainError::Http(format!("{}: {}", context, e))
    }
}

fn decode_body(
    content_type: &str,
    body: &[u8],
    record_type: RecordType,
) -> Result<TransportAnswer, DomainError> {
    match content_type {
        DNS_MESSAGE_CONTENT_TYPE => {
            let answers = WireCodec::decode(body)?;
            Ok(TransportAnswer::new(answers).with_raw(RawResponse::Wire(body.to_vec())))
        }
        JSON_CONTENT_TYPE | DNS_JSON_CONTENT_TYPE => {
            let value: Value = serde_json::from_slice(body)
                .map_err(|e| DomainError::parse(format!("invalid JSON body: {}", e), body))?;
            let answers = extract_json_answers(&value, record_type);
            Ok(TransportAnswer::new(answers).with_raw(RawResponse::Json(value)))
        }
        "" => Err(DomainError::UnsupportedContentType(
            "response carried no Content-Type".to_string(),
        )),
        other => Err(DomainError::UnsupportedContentType(other.to_string())),
    }
}

/// Pulls `data` out of every `Answer` entry whose numeric `type` matches.
///
/// A body without an `Answer` list yields no answers; a body whose shape is
/// wrong is reported but still yields an empty, successful result.
pub(crate) fn extract_json_answers(value: &Value, record_type: RecordType) -> Vec<String> {
    let Some(object) = value.as_object() else {
        let shape = DomainError::InvalidResponseShape("JSON body is not an object".to_string());
        warn!(error = %shape, "Ignoring DoH JSON body");
        return Vec::new();
    };

    let Some(answer) = object.get("Answer") else {
        debug!(
            status = ?object.get("Status"),
            has_authority = object.contains_key("Authority"),
            "DoH JSON response has no Answer section"
        );
        return Vec::new();
    };

    let Some(entries) = answer.as_array() else {
        let shape = DomainError::InvalidResponseShape("Answer is not a list".to_string());
        warn!(error = %shape, "Ignoring DoH JSON body");
        return Vec::new();
    };

    let wanted = u64::from(record_type.to_u16());
    entries
        .iter()
        .filter_map(|entry| {
            let rtype = entry.get("type")?.as_u64()?;
            let data = entry.get("data")?;
            (rtype == wanted).then(|| match data {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .collect()
}
