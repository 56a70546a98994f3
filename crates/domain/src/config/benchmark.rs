use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BenchmarkConfig {
    /// Resolutions per (server, domain) pair.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Pause between consecutive resolutions.
    #[serde(default)]
    pub delay_ms: u64,

    #[serde(default = "default_record_type")]
    pub record_type: String,

    #[serde(default)]
    pub domains: Vec<String>,
}

impl BenchmarkConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            delay_ms: 0,
            record_type: default_record_type(),
            domains: Vec::new(),
        }
    }
}

fn default_iterations() -> u32 {
    1
}

fn default_record_type() -> String {
    "A".to_string()
}
