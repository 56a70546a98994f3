#![allow(dead_code)]

pub mod builders;
pub mod dns_server_mock;
pub mod doh_server_mock;
pub mod tls_server_mock;

pub use builders::{ResponseBuilder, ServerBuilder};
pub use dns_server_mock::MockDnsServer;
pub use doh_server_mock::{DohBehavior, MockDohServer};
pub use tls_server_mock::{MockTlsServer, TlsBehavior};
