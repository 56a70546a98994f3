use async_trait::async_trait;
use dnsbench_application::ports::DnsResolver;
use dnsbench_domain::{
    DnsQuery, DnsServer, DomainError, EngineConfig, RecordType, ResolutionResult,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A query as seen by the mock, in call order.
#[derive(Debug, Clone)]
pub struct SeenQuery {
    pub server: String,
    pub domain: String,
    pub record_type: RecordType,
    pub transaction_id: u16,
    pub timeout_ms: u64,
    pub at: Instant,
}

#[derive(Clone)]
pub struct MockDnsResolver {
    responses: Arc<RwLock<HashMap<String, Vec<String>>>>,
    failing_servers: Arc<RwLock<HashMap<String, DomainError>>>,
    seen: Arc<RwLock<Vec<SeenQuery>>>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            failing_servers: Arc::new(RwLock::new(HashMap::new())),
            seen: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_response(&self, domain: &str, answers: &[&str]) {
        self.responses.write().await.insert(
            domain.to_string(),
            answers.iter().map(|a| a.to_string()).collect(),
        );
    }

    pub async fn fail_server(&self, server: &str, error: DomainError) {
        self.failing_servers
            .write()
            .await
            .insert(server.to_string(), error);
    }

    pub async fn seen(&self) -> Vec<SeenQuery> {
        self.seen.read().await.clone()
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(
        &self,
        query: &DnsQuery,
        server: &DnsServer,
        config: &EngineConfig,
    ) -> ResolutionResult {
        self.seen.write().await.push(SeenQuery {
            server: server.name.clone(),
            domain: query.domain.to_string(),
            record_type: query.record_type,
            transaction_id: query.transaction_id,
            timeout_ms: config.timeout_ms,
            at: Instant::now(),
        });

        let elapsed = Duration::from_millis(simulated_ms(query.transaction_id));

        if let Some(error) = self.failing_servers.read().await.get(&server.name) {
            return ResolutionResult::failure(
                server,
                &query.domain,
                query.record_type,
                error,
                elapsed,
            );
        }

        let answers = self
            .responses
            .read()
            .await
            .get(query.domain.as_ref())
            .cloned()
            .unwrap_or_default();

        ResolutionResult::success(server, &query.domain, query.record_type, answers, elapsed)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// Latency derived from the transaction id so repeated calls differ the way
// real measurements would.
fn simulated_ms(transaction_id: u16) -> u64 {
    1 + u64::from(transaction_id % 50)
}
