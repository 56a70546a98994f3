use crate::ports::DnsResolver;
use dnsbench_domain::{DnsQuery, DnsServer, EngineConfig, RecordType, ResolutionResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Instrumentation boundary around any [`DnsResolver`].
///
/// Transports stay silent about outcomes; this use case is the single place
/// that reports one event per resolution.
pub struct ResolveDomainUseCase {
    resolver: Arc<dyn DnsResolver>,
    config: EngineConfig,
}

impl ResolveDomainUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>, config: EngineConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves `domain` against `server`. Unknown record type names fall
    /// back to `A`.
    pub async fn execute(
        &self,
        domain: &str,
        server: &DnsServer,
        record_type: &str,
    ) -> ResolutionResult {
        let query = DnsQuery::new(domain, RecordType::parse_or_default(record_type));
        self.execute_query(&query, server).await
    }

    pub async fn execute_query(&self, query: &DnsQuery, server: &DnsServer) -> ResolutionResult {
        debug!(
            server = %server.name,
            transport = self.resolver.name(),
            endpoint = %server.endpoint(),
            domain = %query.domain,
            record_type = %query.record_type,
            "Resolving"
        );

        let result = self.resolver.resolve(query, server, &self.config).await;

        match result.answers() {
            Some(answers) => {
                if answers.is_empty() {
                    debug!(
                        server = %server.name,
                        domain = %query.domain,
                        record_type = %query.record_type,
                        "Empty answer section"
                    );
                }
                info!(
                    server = %server.name,
                    transport = self.resolver.name(),
                    domain = %query.domain,
                    record_type = %query.record_type,
                    method = result.method(),
                    answers = answers.len(),
                    elapsed_ms = result.response_time_ms(),
                    "Resolution succeeded"
                );
            }
            None => {
                warn!(
                    server = %server.name,
                    transport = self.resolver.name(),
                    domain = %query.domain,
                    record_type = %query.record_type,
                    error_kind = result.error_kind().map(|k| k.as_str()),
                    error = result.error(),
                    elapsed_ms = result.response_time_ms(),
                    "Resolution failed"
                );
            }
        }

        result
    }
}
