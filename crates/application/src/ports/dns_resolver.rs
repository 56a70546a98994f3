use async_trait::async_trait;
use dnsbench_domain::{DnsQuery, DnsServer, EngineConfig, ResolutionResult};

/// One way of getting an answer out of an upstream.
///
/// Implementations never fail: every transport, parse or protocol problem is
/// folded into a `success: false` [`ResolutionResult`]. The engine config is
/// passed per call so implementations hold no timeout state of their own.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(
        &self,
        query: &DnsQuery,
        server: &DnsServer,
        config: &EngineConfig,
    ) -> ResolutionResult;

    /// Short transport label used in log fields.
    fn name(&self) -> &'static str;
}
