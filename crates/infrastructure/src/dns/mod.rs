pub mod engine;
pub mod framing;
pub mod transport;
pub mod wire;

pub use engine::DnsEngine;
pub use framing::{FrameEvent, FrameOutcome, FrameReassembler, FrameState};
pub use transport::{ProtocolResolver, TransportAnswer, TransportRouter};
pub use wire::WireCodec;
