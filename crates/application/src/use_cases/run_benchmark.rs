use super::ResolveDomainUseCase;
use dnsbench_domain::{BenchmarkConfig, DnsServer, ResolutionResult, ServerType};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Latency statistics for one server across a run. The latency fields only
/// cover successful resolutions and are `None` when there were none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSummary {
    pub server: String,
    pub server_type: ServerType,
    pub count: usize,
    pub successes: usize,
    pub min_ms: Option<f64>,
    pub avg_ms: Option<f64>,
    pub max_ms: Option<f64>,
}

impl BenchmarkSummary {
    pub fn from_results<'a>(
        server: &DnsServer,
        results: impl IntoIterator<Item = &'a ResolutionResult>,
    ) -> Self {
        let mut count = 0;
        let mut latencies = Vec::new();

        for result in results {
            count += 1;
            if result.is_success() {
                latencies.push(result.response_time_ms());
            }
        }

        let successes = latencies.len();
        let min_ms = latencies.iter().copied().reduce(f64::min);
        let max_ms = latencies.iter().copied().reduce(f64::max);
        let avg_ms = (successes > 0).then(|| latencies.iter().sum::<f64>() / successes as f64);

        Self {
            server: server.name.clone(),
            server_type: server.server_type,
            count,
            successes,
            min_ms,
            avg_ms,
            max_ms,
        }
    }

    pub fn failures(&self) -> usize {
        self.count - self.successes
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub results: Vec<ResolutionResult>,
    pub summaries: Vec<BenchmarkSummary>,
}

/// Runs every (server, domain, iteration) tuple one after another.
///
/// Failures never stop the run; each resolution is isolated.
pub struct RunBenchmarkUseCase {
    resolve: Arc<ResolveDomainUseCase>,
}

impl RunBenchmarkUseCase {
    pub fn new(resolve: Arc<ResolveDomainUseCase>) -> Self {
        Self { resolve }
    }

    pub async fn execute(&self, servers: &[DnsServer], plan: &BenchmarkConfig) -> BenchmarkReport {
        let delay = plan.delay();
        let iterations = plan.iterations.max(1);
        let mut results = Vec::with_capacity(servers.len() * plan.domains.len() * iterations as usize);
        let mut summaries = Vec::with_capacity(servers.len());

        for server in servers {
            let first = results.len();
            for domain in &plan.domains {
                for _ in 0..iterations {
                    if !results.is_empty() && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let result = self
                        .resolve
                        .execute(domain, server, &plan.record_type)
                        .await;
                    results.push(result);
                }
            }

            let summary = BenchmarkSummary::from_results(server, &results[first..]);
            info!(
                server = %summary.server,
                count = summary.count,
                successes = summary.successes,
                avg_ms = summary.avg_ms,
                "Server benchmark complete"
            );
            summaries.push(summary);
        }

        BenchmarkReport { results, summaries }
    }
}
