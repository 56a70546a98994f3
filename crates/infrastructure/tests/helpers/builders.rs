#![allow(dead_code)]
use dnsbench_domain::{DnsServer, DohFormat, DohMethod, ServerType};
use std::net::SocketAddr;

/// Builds a response to whatever query it is handed: same id and question,
/// answers pointing back at the question name.
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    answers: Vec<(u16, Vec<u8>)>,
    rcode: u8,
    truncated: bool,
    id: Option<u16>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn a(self, ip: [u8; 4]) -> Self {
        self.record(1, ip.to_vec())
    }

    pub fn aaaa(self, ip: [u8; 16]) -> Self {
        self.record(28, ip.to_vec())
    }

    pub fn cname(self, target: &str) -> Self {
        self.record(5, encode_name(target))
    }

    pub fn ns(self, target: &str) -> Self {
        self.record(2, encode_name(target))
    }

    pub fn mx(self, preference: u16, exchange: &str) -> Self {
        let mut rdata = preference.to_be_bytes().to_vec();
        rdata.extend_from_slice(&encode_name(exchange));
        self.record(15, rdata)
    }

    pub fn txt(self, strings: &[&str]) -> Self {
        let mut rdata = Vec::new();
        for s in strings {
            rdata.push(s.len() as u8);
            rdata.extend_from_slice(s.as_bytes());
        }
        self.record(16, rdata)
    }

    pub fn record(mut self, rtype: u16, rdata: Vec<u8>) -> Self {
        self.answers.push((rtype, rdata));
        self
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.rcode = rcode;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    pub fn with_id(mut self, id: u16) -> Self {
        self.id = Some(id);
        self
    }

    pub fn build(&self, query: &[u8]) -> Vec<u8> {
        if query.len() < 12 {
            return vec![];
        }

        let mut response = Vec::with_capacity(512);
        match self.id {
            Some(id) => response.extend_from_slice(&id.to_be_bytes()),
            None => response.extend_from_slice(&query[0..2]),
        }

        // QR + RD, TC when asked; RA + rcode
        response.push(if self.truncated { 0x83 } else { 0x81 });
        response.push(0x80 | (self.rcode & 0x0F));

        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&(self.answers.len() as u16).to_be_bytes());
        response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        response.extend_from_slice(&query[12..]);

        for (rtype, rdata) in &self.answers {
            response.extend_from_slice(&[0xc0, 0x0c]);
            response.extend_from_slice(&rtype.to_be_bytes());
            response.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x3c]);
            response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            response.extend_from_slice(rdata);
        }

        response
    }
}

pub fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

pub struct ServerBuilder;

impl ServerBuilder {
    pub fn classic(addr: SocketAddr) -> DnsServer {
        let server_type = if addr.is_ipv4() {
            ServerType::IPv4
        } else {
            ServerType::IPv6
        };
        DnsServer::new("mock", addr.ip().to_string(), server_type).with_port(addr.port())
    }

    pub fn tls(addr: SocketAddr) -> DnsServer {
        DnsServer::new("mock-dot", addr.ip().to_string(), ServerType::DoT).with_port(addr.port())
    }

    pub fn doh(url: &str) -> DnsServer {
        DnsServer::new("mock-doh", url, ServerType::DoH)
    }

    pub fn doh_with(url: &str, method: DohMethod, format: DohFormat) -> DnsServer {
        Self::doh(url).with_doh_preference(method, format)
    }
}
