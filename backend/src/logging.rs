//! Logging setup.

use anyhow::Context;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Build the log filter: `RUST_LOG` first, then the configured level, then `info`.
pub fn env_filter(config: &Config) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            let level = config.log_level.as_deref().unwrap_or("info");
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{}'", level))
        }
    }
}

/// Install the global subscriber.
///
/// When `log_file` is configured, logs also go to that file. The returned
/// guard flushes the file writer and must be held until shutdown.
pub fn init(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = env_filter(config)?;
    let stdout_layer = fmt::layer().with_target(false).compact();

    let Some(log_file) = &config.log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .try_init()?;
        return Ok(None);
    };

    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", log_file.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;

    Ok(Some(guard))
}
