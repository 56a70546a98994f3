use dnsbench_domain::{DnsQuery, DomainError, RecordType};
use std::fmt::Write;
use std::net::Ipv4Addr;

const HEADER_LEN: usize = 12;
const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;
/// Standard query, recursion desired.
const QUERY_FLAGS: u16 = 0x0100;
const CLASS_IN: u16 = 1;
const TYPE_A: u16 = 1;
const TYPE_AAAA: u16 = 28;

/// Encodes single-question queries and pulls A/AAAA answers out of responses.
///
/// Everything else in the answer section is walked over but not emitted.
pub struct WireCodec;

impl WireCodec {
    /// Builds the query message for `query`. Labels are emitted as given and
    /// empty labels are skipped. A label over 63 bytes or a name over 255
    /// bytes on the wire is rejected, the same names the classic path refuses.
    pub fn encode(query: &DnsQuery) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(HEADER_LEN + query.domain.len() + 6);

        buf.extend_from_slice(&query.transaction_id.to_be_bytes());
        buf.extend_from_slice(&QUERY_FLAGS.to_be_bytes());
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        for label in query.domain.split('.').filter(|l| !l.is_empty()) {
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::Resolution(format!(
                    "Invalid domain '{}': label of {} bytes exceeds {}",
                    query.domain,
                    label.len(),
                    MAX_LABEL_LEN
                )));
            }
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
        buf.push(0);

        let name_len = buf.len() - HEADER_LEN;
        if name_len > MAX_NAME_LEN {
            return Err(DomainError::Resolution(format!(
                "Invalid domain '{}': name of {} bytes exceeds {}",
                query.domain, name_len, MAX_NAME_LEN
            )));
        }

        buf.extend_from_slice(&query.record_type.to_u16().to_be_bytes());
        buf.extend_from_slice(&CLASS_IN.to_be_bytes());
        Ok(buf)
    }

    /// Creates a fresh query with a random transaction id and encodes it.
    pub fn encode_query(
        domain: &str,
        record_type: RecordType,
    ) -> Result<(DnsQuery, Vec<u8>), DomainError> {
        let query = DnsQuery::new(domain, record_type);
        let bytes = Self::encode(&query)?;
        Ok((query, bytes))
    }

    pub fn transaction_id(message: &[u8]) -> Option<u16> {
        match message {
            [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }

    /// Returns the A (dotted quad) and AAAA (eight uncompressed lowercase hex
    /// groups) answers in message order.
    pub fn decode(message: &[u8]) -> Result<Vec<String>, DomainError> {
        if message.len() < HEADER_LEN {
            return Err(DomainError::parse(
                format!("message is {} bytes, shorter than the header", message.len()),
                message,
            ));
        }

        let qdcount = u16::from_be_bytes([message[4], message[5]]);
        let ancount = u16::from_be_bytes([message[6], message[7]]);

        let mut pos = HEADER_LEN;

        for _ in 0..qdcount {
            pos = skip_name(message, pos)?;
            pos = advance(message, pos, 4, "question type/class")?;
        }

        let mut answers = Vec::new();

        for _ in 0..ancount {
            pos = skip_name(message, pos)?;
            let fixed = pos;
            pos = advance(message, pos, 10, "answer type/class/ttl/rdlength")?;

            let rtype = u16::from_be_bytes([message[fixed], message[fixed + 1]]);
            let rdlength = u16::from_be_bytes([message[fixed + 8], message[fixed + 9]]) as usize;

            let rdata_start = pos;
            pos = advance(message, pos, rdlength, "answer rdata")?;
            let rdata = &message[rdata_start..pos];

            match (rtype, rdlength) {
                (TYPE_A, 4) => {
                    answers.push(Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]).to_string());
                }
                (TYPE_AAAA, 16) => answers.push(format_aaaa(rdata)),
                _ => {}
            }
        }

        Ok(answers)
    }
}

/// Walks a possibly compressed name starting at `pos` and returns the offset
/// just past it. A pointer ends the name in the current position.
fn skip_name(message: &[u8], mut pos: usize) -> Result<usize, DomainError> {
    loop {
        let Some(&len) = message.get(pos) else {
            return Err(DomainError::parse(
                format!("name at offset {} runs past end of message", pos),
                message,
            ));
        };

        match len & 0xC0 {
            0xC0 => return advance(message, pos, 2, "compression pointer"),
            0x00 if len == 0 => return Ok(pos + 1),
            0x00 => pos = advance(message, pos, 1 + len as usize, "label")?,
            _ => {
                return Err(DomainError::parse(
                    format!("unsupported label type 0x{:02x} at offset {}", len, pos),
                    message,
                ))
            }
        }
    }
}

fn advance(message: &[u8], pos: usize, by: usize, what: &str) -> Result<usize, DomainError> {
    let end = pos + by;
    if end > message.len() {
        return Err(DomainError::parse(
            format!(
                "{} at offset {} needs {} bytes, only {} left",
                what,
                pos,
                by,
                message.len().saturating_sub(pos)
            ),
            message,
        ));
    }
    Ok(end)
}

fn format_aaaa(rdata: &[u8]) -> String {
    let mut out = String::with_capacity(39);
    for (i, group) in rdata.chunks_exact(2).enumerate() {
        if i > 0 {
            out.push(':');
        }
        let _ = write!(out, "{:x}", u16::from_be_bytes([group[0], group[1]]));
    }
    out
}
