pub mod classic;
pub mod https;
pub mod providers;
pub mod quic;
pub mod tcp;
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use dnsbench_application::ports::DnsResolver;
use dnsbench_domain::{
    hex_sample, DnsQuery, DnsServer, DohMethod, DomainError, EngineConfig, RawResponse,
    ResolutionResult, ServerType,
};
use std::time::Instant;
use tracing::{debug, warn};

pub use classic::ClassicTransport;
pub use https::HttpsTransport;
pub use quic::QuicTransport;
pub use tls::TlsTransport;

/// Bytes of a failed payload written to the log.
const RAW_SAMPLE_LEN: usize = 48;

/// What a transport hands back on success, before timing is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportAnswer {
    pub answers: Vec<String>,
    pub method: Option<DohMethod>,
    pub raw: Option<RawResponse>,
}

impl TransportAnswer {
    pub fn new(answers: Vec<String>) -> Self {
        Self {
            answers,
            method: None,
            raw: None,
        }
    }

    pub fn with_method(mut self, method: DohMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_raw(mut self, raw: RawResponse) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// One variant per protocol family. Every variant is stateless; the engine
/// config arrives with each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolResolver {
    Classic(ClassicTransport),
    Https(HttpsTransport),
    Tls(TlsTransport),
    Quic(QuicTransport),
}

impl ProtocolResolver {
    pub fn for_server_type(server_type: ServerType) -> Self {
        match server_type {
            ServerType::IPv4 | ServerType::IPv6 => Self::Classic(ClassicTransport),
            ServerType::DoH => Self::Https(HttpsTransport),
            ServerType::DoT => Self::Tls(TlsTransport),
            ServerType::DoQ => Self::Quic(QuicTransport),
        }
    }

    pub async fn query(
        &self,
        query: &DnsQuery,
        server: &DnsServer,
        config: &EngineConfig,
    ) -> Result<TransportAnswer, DomainError> {
        match self {
            Self::Classic(t) => t.query(query, server, config).await,
            Self::Https(t) => t.query(query, server, config).await,
            Self::Tls(t) => t.query(query, server, config).await,
            Self::Quic(t) => t.query(query, server, config).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Classic(_) => "classic",
            Self::Https(_) => "doh",
            Self::Tls(_) => "dot",
            Self::Quic(_) => "doq",
        }
    }
}

#[async_trait]
impl DnsResolver for ProtocolResolver {
    async fn resolve(
        &self,
        query: &DnsQuery,
        server: &DnsServer,
        config: &EngineConfig,
    ) -> ResolutionResult {
        let start = Instant::now();
        let outcome = self.query(query, server, config).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(answer) => {
                let mut result = ResolutionResult::success(
                    server,
                    &query.domain,
                    query.record_type,
                    answer.answers,
                    elapsed,
                );
                if let Some(method) = answer.method {
                    result = result.with_method(method.as_str());
                }
                if let Some(raw) = answer.raw {
                    result = result.with_raw_response(raw);
                }
                result
            }
            Err(e) => {
                if let Some(raw) = e.raw_payload() {
                    warn!(
                        server = %server.name,
                        transport = self.protocol_name(),
                        domain = %query.domain,
                        raw_len = raw.len(),
                        raw_sample = %hex_sample(raw, RAW_SAMPLE_LEN),
                        error = %e,
                        "Unparseable response"
                    );
                }
                ResolutionResult::failure(server, &query.domain, query.record_type, &e, elapsed)
            }
        }
    }

    fn name(&self) -> &'static str {
        self.protocol_name()
    }
}

/// Picks the [`ProtocolResolver`] matching each server's declared type.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportRouter;

#[async_trait]
impl DnsResolver for TransportRouter {
    async fn resolve(
        &self,
        query: &DnsQuery,
        server: &DnsServer,
        config: &EngineConfig,
    ) -> ResolutionResult {
        let resolver = ProtocolResolver::for_server_type(server.server_type);
        debug!(
            server = %server.name,
            server_type = %server.server_type,
            transport = resolver.name(),
            "Dispatching query"
        );
        resolver.resolve(query, server, config).await
    }

    fn name(&self) -> &'static str {
        "router"
    }
}
