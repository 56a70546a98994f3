use crate::{DnsServer, DohFormat, DohMethod, ServerType};

/// Built-in provider list used when no `[[servers]]` are configured.
pub fn default_servers() -> Vec<DnsServer> {
    vec![
        DnsServer::new("Google", "8.8.8.8", ServerType::IPv4),
        DnsServer::new("Cloudflare", "1.1.1.1", ServerType::IPv4),
        DnsServer::new("Quad9", "9.9.9.9", ServerType::IPv4),
        DnsServer::new("Google IPv6", "2001:4860:4860::8888", ServerType::IPv6),
        DnsServer::new("Cloudflare IPv6", "2606:4700:4700::1111", ServerType::IPv6),
        DnsServer::new(
            "Cloudflare DoH",
            "https://cloudflare-dns.com/dns-query",
            ServerType::DoH,
        ),
        DnsServer::new("Google DoH", "https://dns.google/resolve", ServerType::DoH)
            .with_doh_preference(DohMethod::Get, DohFormat::Json),
        DnsServer::new("Quad9 DoH", "https://dns.quad9.net/dns-query", ServerType::DoH),
        DnsServer::new("Cloudflare DoT", "1.1.1.1", ServerType::DoT),
        DnsServer::new("Quad9 DoT", "9.9.9.9", ServerType::DoT),
        DnsServer::new("AdGuard DoQ", "94.140.14.14", ServerType::DoQ),
    ]
}
