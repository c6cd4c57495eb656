//! Structured logging via the `tracing` ecosystem.
//!
//! Console output with uptime timestamps and module paths, plus a JSON
//! file layer in debug builds for post-mortem analysis. The log level
//! comes from `RUST_LOG` when set, otherwise from the config file.

use std::path::Path;

use lumina_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";
const LOG_FILE: &str = "lumina.log";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when present; otherwise the filter comes from
/// `config.debug.log_level`, falling back to `info` with wgpu and naga
/// quieted. With `debug_build` set and a `log_dir` given, a JSON file
/// layer writes `lumina.log` next to the console output.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured_filter(config)));

    let console = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let registry = tracing_subscriber::registry().with(env_filter).with(console);

    if debug_build
        && let Some(dir) = log_dir
        && std::fs::create_dir_all(dir).is_ok()
        && let Ok(file) = std::fs::File::create(dir.join(LOG_FILE))
    {
        let json_file = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();
        registry.with(json_file).init();
        return;
    }

    registry.init();
}

/// An `EnvFilter` built from the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Filter directive from the config, or the quiet-GPU default when the
/// config is absent or silent.
fn configured_filter(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}
