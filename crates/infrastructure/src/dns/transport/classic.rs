//! Classic DNS against one explicit upstream: UDP first, TCP when the
//! response comes back truncated.
//!
//! Messages are built and parsed with `hickory-proto` so every record type
//! the benchmark supports can be rendered, not only addresses.

use super::{tcp, udp, TransportAnswer};
use crate::dns::wire::WireCodec;
use dnsbench_domain::{
    DnsQuery, DnsServer, DomainError, EngineConfig, RawResponse, ServerType,
};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType as WireRecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassicTransport;

impl ClassicTransport {
    pub async fn query(
        &self,
        query: &DnsQuery,
        server: &DnsServer,
        config: &EngineConfig,
    ) -> Result<TransportAnswer, DomainError> {
        let timeout = config.timeout();
        let deadline = Instant::now() + timeout;

        let addr = tokio::time::timeout(timeout, resolve_server_addr(server))
            .await
            .map_err(|_| DomainError::timeout(format!("resolving {}", server.host()), timeout))??;

        let request = build_query(query)?;

        let mut bytes = udp::exchange(addr, &request, remaining(deadline)).await?;
        let mut message = parse_message(&bytes)?;

        if message.truncated() {
            debug!(server = %addr, "Truncated UDP response, retrying over TCP");
            bytes = tcp::exchange(addr, &request, remaining(deadline)).await?;
            message = parse_message(&bytes)?;
        }

        if WireCodec::transaction_id(&bytes) != Some(query.transaction_id) {
            let shape = DomainError::InvalidResponseShape(format!(
                "response id {:?} does not match query id {}",
                WireCodec::transaction_id(&bytes),
                query.transaction_id
            ));
            warn!(server = %addr, domain = %query.domain, error = %shape, "Using answers anyway");
        }

        let rcode = message.response_code();
        if rcode != ResponseCode::NoError {
            return Err(DomainError::Resolution(format!(
                "{} for {} from {}",
                rcode_name(rcode),
                query.domain,
                addr
            )));
        }

        let wanted = WireRecordType::from(query.record_type.to_u16());
        let answers: Vec<String> = message
            .answers()
            .iter()
            .filter(|record| record.record_type() == wanted)
            .map(|record| render(record.data()))
            .collect();

        if answers.is_empty() {
            debug!(
                server = %addr,
                domain = %query.domain,
                record_type = %query.record_type,
                total_answers = message.answers().len(),
                "No answers of the queried type"
            );
        }

        Ok(TransportAnswer::new(answers).with_raw(RawResponse::Wire(bytes)))
    }
}

/// Socket address for a classic or DoT server. Hostnames go through the
/// system resolver; IPv6-typed servers prefer an IPv6 result.
pub(crate) async fn resolve_server_addr(server: &DnsServer) -> Result<SocketAddr, DomainError> {
    let port = server.effective_port();
    if let Some(ip) = server.ip() {
        return Ok(SocketAddr::new(ip, port));
    }

    let host = server.host();
    if host.is_empty() {
        return Err(DomainError::InvalidServer(format!(
            "Server '{}' has no address",
            server.name
        )));
    }

    let candidates: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| DomainError::Connection(format!("Failed to resolve {}: {}", host, e)))?
        .collect();

    let want_v6 = server.server_type == ServerType::IPv6;
    candidates
        .iter()
        .find(|addr| addr.is_ipv6() == want_v6)
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(|| DomainError::Connection(format!("No addresses found for {}", host)))
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

fn build_query(query: &DnsQuery) -> Result<Vec<u8>, DomainError> {
    let name = Name::from_str(&query.domain).map_err(|e| {
        DomainError::Resolution(format!("Invalid domain '{}': {}", query.domain, e))
    })?;

    let mut question = Query::new();
    question.set_name(name);
    question.set_query_type(WireRecordType::from(query.record_type.to_u16()));
    question.set_query_class(DNSClass::IN);

    let mut message = Message::new(query.transaction_id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(question);

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::Resolution(format!("Failed to encode query: {}", e)))?;
    Ok(buf)
}

fn parse_message(bytes: &[u8]) -> Result<Message, DomainError> {
    Message::from_vec(bytes).map_err(|e| DomainError::parse(e.to_string(), bytes))
}

fn render(data: &RData) -> String {
    match data {
        RData::A(a) => a.0.to_string(),
        RData::AAAA(aaaa) => aaaa.0.to_string(),
        RData::MX(mx) => format!(
            "{} {}",
            mx.preference(),
            trim_root(&mx.exchange().to_string())
        ),
        RData::TXT(txt) => txt
            .txt_data()
            .iter()
            .map(|chunk| String::from_utf8_lossy(chunk))
            .collect(),
        RData::NS(_) | RData::CNAME(_) | RData::PTR(_) => trim_root(&data.to_string()).to_string(),
        other => other.to_string(),
    }
}

fn trim_root(name: &str) -> &str {
    if name.len() > 1 {
        name.strip_suffix('.').unwrap_or(name)
    } else {
        name
    }
}

fn rcode_name(rcode: ResponseCode) -> &'static str {
    match rcode {
        ResponseCode::NoError => "NOERROR",
        ResponseCode::NXDomain => "NXDOMAIN",
        ResponseCode::ServFail => "SERVFAIL",
        ResponseCode::Refused => "REFUSED",
        ResponseCode::NotImp => "NOTIMP",
        ResponseCode::FormErr => "FORMERR",
        _ => "UNKNOWN",
    }
}
