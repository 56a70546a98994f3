//! DNS-over-TLS (RFC 7858)
//!
//! One fresh connection per query, so every measurement includes the TCP
//! connect and TLS handshake. Certificates are not validated. A single
//! timer bounds connect, handshake and the framed exchange; the response
//! frame is reassembled by [`FrameReassembler`].

use super::classic::resolve_server_addr;
use super::tcp::{read_frame, send_with_length_prefix};
use super::TransportAnswer;
use crate::dns::framing::{FrameEvent, FrameOutcome, FrameReassembler};
use crate::dns::wire::WireCodec;
use dnsbench_domain::{DnsQuery, DnsServer, DomainError, EngineConfig, RawResponse};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use std::sync::{Arc, LazyLock};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Shared TLS config, built once and reused for all DoT queries.
static SHARED_TLS_CONFIG: LazyLock<Arc<rustls::ClientConfig>> = LazyLock::new(|| {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    let verifier = AcceptAnyServerCert::new(Arc::new(
        rustls::crypto::aws_lc_rs::default_provider(),
    ));

    let config = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();

    Arc::new(config)
});

/// Accepts whatever certificate the upstream presents while still checking
/// handshake signatures.
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl AcceptAnyServerCert {
    fn new(provider: Arc<CryptoProvider>) -> Self {
        Self { provider }
    }
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlsTransport;

impl TlsTransport {
    pub async fn query(
        &self,
        query: &DnsQuery,
        server: &DnsServer,
        config: &EngineConfig,
    ) -> Result<TransportAnswer, DomainError> {
        let timeout = config.timeout();
        let endpoint = format!("DoT {}", server.endpoint());
        let request = WireCodec::encode(query)?;
        let mut reassembler = FrameReassembler::new();

        let timed = tokio::time::timeout(
            timeout,
            Self::exchange(server, &request, &mut reassembler),
        )
        .await;

        // Dropping the exchange future on expiry closes the socket.
        let outcome = match timed {
            Ok(outcome) => outcome,
            Err(_) => reassembler.handle(FrameEvent::TimedOut),
        };

        let frame = outcome
            .unwrap_or(FrameOutcome::TimedOut)
            .into_frame(&endpoint, timeout)?;

        debug!(server = %server.name, response_len = frame.len(), "DoT response received");

        let answers = WireCodec::decode(&frame)?;
        Ok(TransportAnswer::new(answers).with_raw(RawResponse::Wire(frame)))
    }

    async fn exchange(
        server: &DnsServer,
        request: &[u8],
        reassembler: &mut FrameReassembler,
    ) -> Option<FrameOutcome> {
        let addr = match resolve_server_addr(server).await {
            Ok(addr) => addr,
            Err(e) => return reassembler.handle(FrameEvent::SocketError(e.to_string())),
        };

        let server_name = match server.ip() {
            Some(ip) => ServerName::from(ip),
            None => match ServerName::try_from(server.host().to_string()) {
                Ok(name) => name,
                Err(e) => {
                    return reassembler.handle(FrameEvent::SocketError(format!(
                        "Invalid TLS server name '{}': {}",
                        server.host(),
                        e
                    )))
                }
            },
        };

        let tcp_stream = match TcpStream::connect(addr).await {
            Ok(stream) => stream,
            Err(e) => {
                return reassembler.handle(FrameEvent::SocketError(format!(
                    "Connection refused by TLS server {}: {}",
                    addr, e
                )))
            }
        };
        let _ = tcp_stream.set_nodelay(true);

        let connector = TlsConnector::from(SHARED_TLS_CONFIG.clone());
        let mut stream = match connector.connect(server_name, tcp_stream).await {
            Ok(stream) => stream,
            Err(e) => {
                return reassembler.handle(FrameEvent::SocketError(format!(
                    "TLS handshake failed with {}: {}",
                    addr, e
                )))
            }
        };

        debug!(server = %addr, "TLS connection established");
        reassembler.handle(FrameEvent::Connected);

        if let Err(e) = send_with_length_prefix(&mut stream, request).await {
            return reassembler.handle(FrameEvent::SocketError(e.to_string()));
        }

        let outcome = read_frame(&mut stream, reassembler).await;
        drop(stream);
        outcome
    }
}
