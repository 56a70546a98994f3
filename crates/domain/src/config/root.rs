use serde::{Deserialize, Serialize};

use super::benchmark::BenchmarkConfig;
use super::engine::EngineConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::providers::default_servers;
use crate::{DnsServer, ServerType};

const LOCAL_CONFIG_PATH: &str = "dnsbench.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dnsbench/config.toml";

/// Main configuration structure for dnsbench
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Resolution engine settings (timeout)
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Benchmark run settings
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Servers under test
    #[serde(default = "default_servers")]
    pub servers: Vec<DnsServer>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            logging: LoggingConfig::default(),
            benchmark: BenchmarkConfig::default(),
            servers: default_servers(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnsbench.toml in current directory
    /// 3. /etc/dnsbench/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.engine.timeout_ms = timeout_ms;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(iterations) = overrides.iterations {
            self.benchmark.iterations = iterations;
        }
        if let Some(delay_ms) = overrides.delay_ms {
            self.benchmark.delay_ms = delay_ms;
        }
        if let Some(record_type) = overrides.record_type {
            self.benchmark.record_type = record_type;
        }
        if !overrides.domains.is_empty() {
            self.benchmark.domains = overrides.domains;
        }
        if !overrides.endpoints.is_empty() {
            self.servers = overrides.endpoints;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Engine timeout cannot be 0".to_string(),
            ));
        }

        if self.servers.is_empty() {
            return Err(ConfigError::Validation("No servers configured".to_string()));
        }

        for server in &self.servers {
            match server.server_type {
                ServerType::DoH => {
                    let address = server.address.trim();
                    if !(address.starts_with("https://") || address.starts_with("http://")) {
                        return Err(ConfigError::Validation(format!(
                            "DoH server '{}' needs an https:// origin, got '{}'",
                            server.name, server.address
                        )));
                    }
                }
                _ => {
                    if server.host().is_empty() {
                        return Err(ConfigError::Validation(format!(
                            "Server '{}' has an empty address",
                            server.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Servers whose name matches one of `names` (case-insensitive), or all
    /// servers when `names` is empty.
    pub fn select_servers(&self, names: &[String]) -> Vec<DnsServer> {
        if names.is_empty() {
            return self.servers.clone();
        }
        self.servers
            .iter()
            .filter(|s| names.iter().any(|n| n.eq_ignore_ascii_case(&s.name)))
            .cloned()
            .collect()
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub timeout_ms: Option<u64>,
    pub log_level: Option<String>,
    pub iterations: Option<u32>,
    pub delay_ms: Option<u64>,
    pub record_type: Option<String>,
    pub domains: Vec<String>,
    /// Ad-hoc servers replacing the configured list.
    pub endpoints: Vec<DnsServer>,
}
