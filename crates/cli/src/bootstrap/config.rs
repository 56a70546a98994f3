use dnsbench_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        timeout_ms = config.engine.timeout_ms,
        servers = config.servers.len(),
        iterations = config.benchmark.iterations,
        record_type = %config.benchmark.record_type,
        "Configuration loaded"
    );

    Ok(config)
}
