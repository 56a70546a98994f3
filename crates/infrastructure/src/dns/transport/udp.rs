//! UDP exchange for classic DNS (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). If the response has the TC bit set
//! the caller retries over TCP.

use dnsbench_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub async fn exchange(
    server_addr: SocketAddr,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    // Bind to ephemeral port (0 = OS assigns)
    let bind_addr: SocketAddr = if server_addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    // Send and receive share one deadline.
    let deadline = Instant::now() + timeout;

    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| DomainError::Connection(format!("Failed to bind UDP socket: {}", e)))?;

    let bytes_sent = timeout_at(deadline, socket.send_to(message_bytes, server_addr))
        .await
        .map_err(|_| DomainError::timeout(format!("UDP send to {}", server_addr), timeout))?
        .map_err(|e| {
            DomainError::Connection(format!(
                "Failed to send UDP query to {}: {}",
                server_addr, e
            ))
        })?;

    debug!(server = %server_addr, bytes_sent = bytes_sent, "UDP query sent");

    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

    let (bytes_received, from_addr) =
        timeout_at(deadline, socket.recv_from(&mut recv_buf))
            .await
            .map_err(|_| DomainError::timeout(format!("UDP response from {}", server_addr), timeout))?
            .map_err(|e| {
                DomainError::Connection(format!(
                    "Failed to receive UDP response from {}: {}",
                    server_addr, e
                ))
            })?;

    if from_addr.ip() != server_addr.ip() {
        warn!(
            expected = %server_addr,
            received_from = %from_addr,
            "UDP response from unexpected source"
        );
    }

    recv_buf.truncate(bytes_received);

    debug!(
        server = %server_addr,
        bytes_received = bytes_received,
        "UDP response received"
    );

    Ok(recv_buf)
}
