use super::RecordType;
use std::sync::Arc;

/// A single question sent to an upstream. Built fresh for every resolution
/// attempt; the transaction id only has to survive the encode/decode trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub transaction_id: u16,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self::with_transaction_id(domain, record_type, fastrand::u16(..))
    }

    pub fn with_transaction_id(
        domain: impl Into<Arc<str>>,
        record_type: RecordType,
        transaction_id: u16,
    ) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            transaction_id,
        }
    }
}
