#![allow(dead_code)]
use super::ResponseBuilder;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

#[derive(Debug, Clone)]
pub enum TlsBehavior {
    /// Answer, writing the framed response `chunk` bytes at a time.
    Respond {
        response: ResponseBuilder,
        chunk: usize,
    },
    /// Complete the handshake, read the query, then say nothing.
    Silent,
    /// Accept TCP but never speak TLS.
    StallHandshake,
    /// Send the length prefix and part of the body, then close.
    CloseEarly,
}

/// Loopback DoT upstream with a throwaway self-signed certificate.
pub struct MockTlsServer {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl MockTlsServer {
    pub async fn start(behavior: TlsBehavior) -> Result<Self, std::io::Error> {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
            .map_err(std::io::Error::other)?;
        let cert: CertificateDer<'static> = certified.cert.der().clone();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
            certified.key_pair.serialize_der(),
        ));

        let config = rustls::ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(vec![cert], key)
            .map_err(std::io::Error::other)?;
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                let behavior = behavior.clone();
                tokio::spawn(async move {
                    if let TlsBehavior::StallHandshake = behavior {
                        let _held = stream;
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        return;
                    }

                    let Ok(mut tls) = acceptor.accept(stream).await else {
                        return;
                    };

                    let mut len = [0u8; 2];
                    if tls.read_exact(&mut len).await.is_err() {
                        return;
                    }
                    let mut query = vec![0u8; u16::from_be_bytes(len) as usize];
                    if tls.read_exact(&mut query).await.is_err() {
                        return;
                    }

                    match behavior {
                        TlsBehavior::Respond { response, chunk } => {
                            let body = response.build(&query);
                            let mut framed = (body.len() as u16).to_be_bytes().to_vec();
                            framed.extend_from_slice(&body);
                            for piece in framed.chunks(chunk.max(1)) {
                                if tls.write_all(piece).await.is_err() {
                                    return;
                                }
                                let _ = tls.flush().await;
                            }
                            tokio::time::sleep(Duration::from_millis(200)).await;
                        }
                        TlsBehavior::Silent => {
                            tokio::time::sleep(Duration::from_secs(30)).await;
                        }
                        TlsBehavior::CloseEarly => {
                            let _ = tls.write_all(&[0x00, 0x40, 0x12, 0x34]).await;
                            let _ = tls.flush().await;
                            let _ = tls.shutdown().await;
                        }
                        TlsBehavior::StallHandshake => {}
                    }
                });
            }
        });

        Ok(Self { addr, task })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MockTlsServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
