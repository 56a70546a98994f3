use dnsbench_domain::{DnsServer, DohFormat, DohMethod};

/// Known public DoH services and the request shape each answers best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DohProvider {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub method: DohMethod,
    pub format: DohFormat,
}

pub const DOH_PROVIDERS: &[DohProvider] = &[
    DohProvider {
        name: "Cloudflare",
        patterns: &["cloudflare-dns.com", "1.1.1.1", "1.0.0.1"],
        method: DohMethod::Get,
        format: DohFormat::Json,
    },
    DohProvider {
        name: "Google",
        patterns: &["dns.google", "8.8.8.8", "8.8.4.4"],
        method: DohMethod::Get,
        format: DohFormat::Json,
    },
    DohProvider {
        name: "Quad9",
        patterns: &["quad9.net", "9.9.9.9"],
        method: DohMethod::Post,
        format: DohFormat::WireFormat,
    },
    DohProvider {
        name: "AdGuard",
        patterns: &["adguard-dns.com", "dns.adguard.com"],
        method: DohMethod::Post,
        format: DohFormat::WireFormat,
    },
    DohProvider {
        name: "OpenDNS",
        patterns: &["opendns.com"],
        method: DohMethod::Post,
        format: DohFormat::WireFormat,
    },
    DohProvider {
        name: "NextDNS",
        patterns: &["nextdns.io"],
        method: DohMethod::Get,
        format: DohFormat::Json,
    },
    DohProvider {
        name: "Mullvad",
        patterns: &["mullvad.net"],
        method: DohMethod::Post,
        format: DohFormat::WireFormat,
    },
];

/// Method/format pair used when neither the server nor the table says
/// otherwise.
pub const DEFAULT_PREFERENCE: (DohMethod, DohFormat) = (DohMethod::Get, DohFormat::Json);

pub fn lookup_provider(address: &str) -> Option<&'static DohProvider> {
    let address = address.to_ascii_lowercase();
    DOH_PROVIDERS
        .iter()
        .find(|p| p.patterns.iter().any(|pattern| address.contains(pattern)))
}

/// Explicit fields on the server win, field by field, over the table entry.
pub fn preference_for(server: &DnsServer) -> (DohMethod, DohFormat) {
    let (table_method, table_format) = lookup_provider(&server.address)
        .map(|p| (p.method, p.format))
        .unwrap_or(DEFAULT_PREFERENCE);
    (
        server.method.unwrap_or(table_method),
        server.format.unwrap_or(table_format),
    )
}
