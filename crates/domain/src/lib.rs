//! dnsbench domain layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod dns_server;
pub mod errors;
pub mod resolution;

pub use config::{BenchmarkConfig, CliOverrides, Config, ConfigError, EngineConfig};
pub use dns_query::DnsQuery;
pub use dns_record::RecordType;
pub use dns_server::{DnsServer, DohFormat, DohMethod, ServerType};
pub use errors::{hex_sample, DomainError, ErrorKind};
pub use resolution::{RawResponse, ResolutionResult};
