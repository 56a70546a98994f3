use clap::Parser;
use dnsbench_application::use_cases::RunBenchmarkUseCase;
use dnsbench_domain::{CliOverrides, DnsServer};
use dnsbench_infrastructure::DnsEngine;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

mod bootstrap;
mod output;

#[derive(Parser, Debug)]
#[command(name = "dnsbench")]
#[command(version)]
#[command(about = "dnsbench - DNS resolution benchmark over UDP/TCP, DoH, DoT and DoQ")]
struct Cli {
    /// Domains to resolve (defaults to [benchmark].domains from the config)
    #[arg(value_name = "DOMAIN")]
    domains: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Only test configured servers with this name (repeatable)
    #[arg(short = 's', long = "server", value_name = "NAME")]
    servers: Vec<String>,

    /// Ad-hoc server replacing the configured list, e.g. udp://8.8.8.8:53,
    /// tls://1.1.1.1:853 or https://dns.google/dns-query (repeatable)
    #[arg(short = 'e', long = "endpoint", value_name = "URL")]
    endpoints: Vec<DnsServer>,

    /// Record type (A, AAAA, CNAME, MX, NS, PTR, SOA, TXT)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    record_type: Option<String>,

    /// Resolutions per server and domain
    #[arg(short = 'n', long)]
    iterations: Option<u32>,

    /// Pause between resolutions in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-resolution timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print one JSON document per result instead of text lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            timeout_ms: self.timeout_ms,
            log_level: self.log_level.clone(),
            iterations: self.iterations,
            delay_ms: self.delay_ms,
            record_type: self.record_type.clone(),
            domains: self.domains.clone(),
            endpoints: self.endpoints.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config);

    info!("Starting dnsbench v{}", env!("CARGO_PKG_VERSION"));

    let servers = config.select_servers(&cli.servers);
    if servers.is_empty() {
        anyhow::bail!("No configured server matches {:?}", cli.servers);
    }
    if config.benchmark.domains.is_empty() {
        anyhow::bail!("No domains given; pass them as arguments or set [benchmark].domains");
    }

    let engine = DnsEngine::new(config.engine);
    let runner = RunBenchmarkUseCase::new(engine.use_case());
    let report = runner.execute(&servers, &config.benchmark).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for result in &report.results {
        if cli.json {
            writeln!(out, "{}", serde_json::to_string(result)?)?;
        } else {
            writeln!(out, "{}", output::format_result(result))?;
        }
    }
    if !cli.json {
        writeln!(out)?;
        write!(out, "{}", output::format_summary(&report.summaries))?;
    }
    out.flush()?;

    info!(
        results = report.results.len(),
        failures = report.summaries.iter().map(|s| s.failures()).sum::<usize>(),
        "Benchmark finished"
    );

    Ok(())
}
