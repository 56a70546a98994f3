pub mod dns;

pub use dns::engine::DnsEngine;
pub use dns::transport::{ProtocolResolver, TransportRouter};
pub use dns::wire::WireCodec;
