use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Query timeout after {timeout_ms} ms ({context})")]
    Timeout { context: String, timeout_ms: u64 },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Failed to parse DNS response: {message}")]
    Parse { message: String, raw: Vec<u8> },

    #[error("{0}")]
    NotImplemented(String),

    #[error("Invalid response shape: {0}")]
    InvalidResponseShape(String),

    #[error("Invalid server: {0}")]
    InvalidServer(String),

    #[error("Resolution failed: {0}")]
    Resolution(String),
}

impl DomainError {
    pub fn timeout(context: impl Into<String>, timeout: std::time::Duration) -> Self {
        DomainError::Timeout {
            context: context.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn parse(message: impl Into<String>, raw: &[u8]) -> Self {
        DomainError::Parse {
            message: message.into(),
            raw: raw.to_vec(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Timeout { .. } => ErrorKind::Timeout,
            DomainError::Connection(_) | DomainError::InvalidServer(_) => ErrorKind::Connection,
            DomainError::Http(_)
            | DomainError::UnsupportedContentType(_)
            | DomainError::Resolution(_) => ErrorKind::Protocol,
            DomainError::Parse { .. } => ErrorKind::Parse,
            DomainError::NotImplemented(_) => ErrorKind::NotImplemented,
            DomainError::InvalidResponseShape(_) => ErrorKind::InvalidResponseShape,
        }
    }

    /// Raw payload captured alongside a parse failure, for diagnostics only.
    pub fn raw_payload(&self) -> Option<&[u8]> {
        match self {
            DomainError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Coarse classification attached to every failed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    Connection,
    Protocol,
    Parse,
    NotImplemented,
    InvalidResponseShape,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connection => "connection",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Parse => "parse",
            ErrorKind::NotImplemented => "not_implemented",
            ErrorKind::InvalidResponseShape => "invalid_response_shape",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders at most `limit` bytes of a payload as hex for log output.
pub fn hex_sample(raw: &[u8], limit: usize) -> String {
    let mut out: String = raw
        .iter()
        .take(limit)
        .map(|b| format!("{:02x}", b))
        .collect();
    if raw.len() > limit {
        out.push_str(&format!("..(+{} bytes)", raw.len() - limit));
    }
    out
}
