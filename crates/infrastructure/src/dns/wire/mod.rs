//! Hand-rolled RFC 1035 message codec used by the DoT and DoH paths.

mod codec;

pub use codec::WireCodec;
