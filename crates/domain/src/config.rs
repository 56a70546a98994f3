pub mod benchmark;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod providers;
pub mod root;

pub use benchmark::BenchmarkConfig;
pub use engine::{EngineConfig, DEFAULT_TIMEOUT_MS};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use providers::default_servers;
pub use root::{CliOverrides, Config};
