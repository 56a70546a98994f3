//! TCP exchange and the 2-byte length framing shared with DoT.

use crate::dns::framing::{FrameEvent, FrameOutcome, FrameReassembler};
use dnsbench_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;
const READ_CHUNK_SIZE: usize = 4096;

/// Sends one query over a fresh connection and reads back one frame. The
/// whole exchange, connect included, is bounded by `timeout`.
pub async fn exchange(
    server_addr: SocketAddr,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    let mut reassembler = FrameReassembler::new();

    let timed = tokio::time::timeout(
        timeout,
        run_exchange(server_addr, message_bytes, &mut reassembler),
    )
    .await;
    let outcome = match timed {
        Ok(outcome) => outcome,
        Err(_) => reassembler.handle(FrameEvent::TimedOut),
    };

    let endpoint = format!("TCP {}", server_addr);
    let frame = outcome
        .unwrap_or(FrameOutcome::TimedOut)
        .into_frame(&endpoint, timeout)?;

    debug!(
        server = %server_addr,
        response_len = frame.len(),
        "TCP response received"
    );

    Ok(frame)
}

async fn run_exchange(
    server_addr: SocketAddr,
    message_bytes: &[u8],
    reassembler: &mut FrameReassembler,
) -> Option<FrameOutcome> {
    let mut stream = match TcpStream::connect(server_addr).await {
        Ok(stream) => stream,
        Err(e) => {
            return reassembler.handle(FrameEvent::SocketError(format!(
                "Connection refused by TCP server {}: {}",
                server_addr, e
            )))
        }
    };
    let _ = stream.set_nodelay(true);
    reassembler.handle(FrameEvent::Connected);

    if let Err(e) = send_with_length_prefix(&mut stream, message_bytes).await {
        return reassembler.handle(FrameEvent::SocketError(e.to_string()));
    }

    debug!(server = %server_addr, message_len = message_bytes.len(), "TCP query sent");

    read_frame(&mut stream, reassembler).await
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWrite + Unpin,
{
    if message_bytes.len() > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::Connection(format!(
            "Query too large: {} bytes (max {})",
            message_bytes.len(),
            MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut framed = Vec::with_capacity(2 + message_bytes.len());
    framed.extend_from_slice(&(message_bytes.len() as u16).to_be_bytes());
    framed.extend_from_slice(message_bytes);

    stream
        .write_all(&framed)
        .await
        .map_err(|e| DomainError::Connection(format!("Failed to write DNS message: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::Connection(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

/// Feeds whatever the stream yields into `reassembler` until it reports an
/// outcome.
pub(crate) async fn read_frame<S>(
    stream: &mut S,
    reassembler: &mut FrameReassembler,
) -> Option<FrameOutcome>
where
    S: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let event = match stream.read(&mut chunk).await {
            Ok(0) => FrameEvent::Closed,
            Ok(n) => FrameEvent::Data(&chunk[..n]),
            Err(e) => FrameEvent::SocketError(format!("Failed to read response: {}", e)),
        };
        let terminal = !matches!(event, FrameEvent::Data(_));
        let outcome = reassembler.handle(event);
        if outcome.is_some() || terminal {
            return outcome;
        }
    }
}
