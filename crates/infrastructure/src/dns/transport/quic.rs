//! DNS-over-QUIC (RFC 9250) placeholder. Keeps the protocol set total
//! without opening any socket.

use super::TransportAnswer;
use dnsbench_domain::{DnsQuery, DnsServer, DomainError, EngineConfig};

pub const DOQ_NOT_IMPLEMENTED: &str =
    "DNS over QUIC (DoQ) is not yet implemented. Use DoH or DoT for encrypted DNS benchmarks.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuicTransport;

impl QuicTransport {
    pub async fn query(
        &self,
        _query: &DnsQuery,
        _server: &DnsServer,
        _config: &EngineConfig,
    ) -> Result<TransportAnswer, DomainError> {
        Err(DomainError::NotImplemented(DOQ_NOT_IMPLEMENTED.to_string()))
    }
}
