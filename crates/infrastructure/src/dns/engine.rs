use super::transport::TransportRouter;
use dnsbench_application::use_cases::ResolveDomainUseCase;
use dnsbench_domain::{DnsServer, EngineConfig, ResolutionResult};
use std::sync::Arc;
use std::time::Duration;

/// Entry point of the resolution engine: `resolve(domain, server, type)`.
///
/// Calls are independent; the only state is the immutable [`EngineConfig`].
pub struct DnsEngine {
    use_case: Arc<ResolveDomainUseCase>,
}

impl Default for DnsEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DnsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            use_case: Arc::new(ResolveDomainUseCase::new(Arc::new(TransportRouter), config)),
        }
    }

    /// Returns an engine using `timeout` for every subsequent call.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self::new(self.config().with_timeout(timeout))
    }

    pub fn config(&self) -> EngineConfig {
        *self.use_case.config()
    }

    pub fn timeout(&self) -> Duration {
        self.config().timeout()
    }

    /// Never fails: every problem ends up in a `success: false` result.
    pub async fn resolve(
        &self,
        domain: &str,
        server: &DnsServer,
        record_type: &str,
    ) -> ResolutionResult {
        self.use_case.execute(domain, server, record_type).await
    }

    /// The instrumented resolver, for callers that sequence many resolutions.
    pub fn use_case(&self) -> Arc<ResolveDomainUseCase> {
        self.use_case.clone()
    }
}
