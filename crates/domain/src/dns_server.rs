use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Transport variant a server is benchmarked over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerType {
    IPv4,
    IPv6,
    DoH,
    DoT,
    DoQ,
}

impl ServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerType::IPv4 => "IPv4",
            ServerType::IPv6 => "IPv6",
            ServerType::DoH => "DoH",
            ServerType::DoT => "DoT",
            ServerType::DoQ => "DoQ",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            ServerType::IPv4 | ServerType::IPv6 => 53,
            ServerType::DoH => 443,
            ServerType::DoT | ServerType::DoQ => 853,
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ServerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ipv4" | "udp" | "classic" => Ok(ServerType::IPv4),
            "ipv6" => Ok(ServerType::IPv6),
            "doh" | "https" => Ok(ServerType::DoH),
            "dot" | "tls" => Ok(ServerType::DoT),
            "doq" | "quic" => Ok(ServerType::DoQ),
            _ => Err(format!("Unknown server type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DohMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
}

impl DohMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DohMethod::Get => "GET",
            DohMethod::Post => "POST",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            DohMethod::Get => DohMethod::Post,
            DohMethod::Post => DohMethod::Get,
        }
    }
}

impl fmt::Display for DohMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DohFormat {
    #[serde(rename = "wireformat")]
    WireFormat,
    #[serde(rename = "json")]
    Json,
}

/// An upstream under test. Immutable for the duration of a test run.
///
/// `address` is an IP literal (or hostname) for classic, DoT and DoQ servers
/// and a full `https://` origin for DoH servers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsServer {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "type")]
    pub server_type: ServerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<DohMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DohFormat>,
}

impl DnsServer {
    pub fn new(name: impl Into<String>, address: impl Into<String>, server_type: ServerType) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            port: None,
            server_type,
            method: None,
            format: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_doh_preference(mut self, method: DohMethod, format: DohFormat) -> Self {
        self.method = Some(method);
        self.format = Some(format);
        self
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.server_type.default_port())
    }

    /// Address with IPv6 brackets stripped, suitable for `(host, port)` lookups.
    pub fn host(&self) -> &str {
        let trimmed = self.address.trim();
        trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed)
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.host().parse().ok()
    }

    /// `host:port` form used in log fields and error messages.
    pub fn endpoint(&self) -> String {
        match self.server_type {
            ServerType::DoH => self.address.clone(),
            _ => match self.ip() {
                Some(IpAddr::V6(v6)) => format!("[{}]:{}", v6, self.effective_port()),
                _ => format!("{}:{}", self.host(), self.effective_port()),
            },
        }
    }
}

impl fmt::Display for DnsServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.server_type, self.endpoint())
    }
}

fn parse_host_port(s: &str) -> Option<(&str, Option<u16>)> {
    if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']')?;
        let host = &rest[..end];
        let tail = &rest[end + 1..];
        if tail.is_empty() {
            return Some((host, None));
        }
        let port = tail.strip_prefix(':')?.parse::<u16>().ok()?;
        return Some((host, Some(port)));
    }
    if s.parse::<IpAddr>().is_ok() {
        return Some((s, None));
    }
    match s.rsplit_once(':') {
        Some((host, port_str)) => Some((host, Some(port_str.parse::<u16>().ok()?))),
        None => Some((s, None)),
    }
}

fn server_from_host_port(
    rest: &str,
    server_type: ServerType,
    original: &str,
) -> Result<DnsServer, String> {
    let (host, port) = parse_host_port(rest)
        .filter(|(host, _)| !host.is_empty())
        .ok_or_else(|| format!("Invalid {} endpoint '{}'", server_type, original))?;
    let mut server = DnsServer::new(original, host, server_type);
    server.port = port;
    Ok(server)
}

/// Parses ad-hoc endpoints such as `udp://8.8.8.8:53`, `tls://1.1.1.1:853`,
/// `https://dns.google/dns-query`, `doq://dns.adguard-dns.com` or a bare IP.
impl FromStr for DnsServer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("https://") || s.starts_with("http://") {
            return Ok(DnsServer::new(s, s, ServerType::DoH));
        }
        if let Some(rest) = s.strip_prefix("udp://").or_else(|| s.strip_prefix("tcp://")) {
            let mut server = server_from_host_port(rest, ServerType::IPv4, s)?;
            if matches!(server.ip(), Some(IpAddr::V6(_))) {
                server.server_type = ServerType::IPv6;
            }
            return Ok(server);
        }
        if let Some(rest) = s.strip_prefix("tls://") {
            return server_from_host_port(rest, ServerType::DoT, s);
        }
        if let Some(rest) = s.strip_prefix("doq://").or_else(|| s.strip_prefix("quic://")) {
            return server_from_host_port(rest, ServerType::DoQ, s);
        }
        match parse_host_port(s) {
            Some((host, port)) => match host.parse::<IpAddr>() {
                Ok(ip) => {
                    let server_type = if ip.is_ipv6() {
                        ServerType::IPv6
                    } else {
                        ServerType::IPv4
                    };
                    let mut server = DnsServer::new(s, host, server_type);
                    server.port = port;
                    Ok(server)
                }
                Err(_) => Err(format!(
                    "Invalid DNS endpoint '{}'. Expected udp://IP:PORT, tls://HOST:PORT, https://URL, doq://HOST:PORT or an IP address",
                    s
                )),
            },
            None => Err(format!("Invalid DNS endpoint '{}'", s)),
        }
    }
}
