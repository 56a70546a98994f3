mod resolve_domain;
mod run_benchmark;

pub use resolve_domain::ResolveDomainUseCase;
pub use run_benchmark::{BenchmarkReport, BenchmarkSummary, RunBenchmarkUseCase};
