//! Logging setup: JSON files for the TUI, stderr for one-shot subcommands.
//!
//! While `start` runs, the alternate screen and raw mode own the terminal,
//! so [`init_production`] installs a file layer only. [`init_cli`] is the
//! stderr setup used by `seed` and `paths`.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking file writer alive.
///
/// Held in `main` for the life of the process; dropping it flushes pending
/// entries and stops the writer thread.
pub struct LoggingGuard {
    _writer: WorkerGuard,
}

/// `RUST_LOG` when set, otherwise the given default.
fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_owned()))
}

/// Initialise logging for the `start` subcommand.
///
/// Writes JSON lines to `{logs_dir}/rotary.log.YYYY-MM-DD`, rotated daily.
/// Nothing goes to stdout or stderr: a console layer would corrupt the UI.
/// `level` is the configured default filter, overridable via `RUST_LOG`.
///
/// # Errors
///
/// Fails when the logs directory cannot be created.
pub fn init_production(logs_dir: &Path, level: &str) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("failed to create logs directory {}", logs_dir.display()))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, "rotary.log"));
    let file_layer = tracing_subscriber::fmt::layer().json().with_writer(file_writer);

    tracing_subscriber::registry()
        .with(filter(level))
        .with(file_layer)
        .init();

    Ok(LoggingGuard { _writer: guard })
}

/// Initialise human-readable stderr logging for the one-shot subcommands.
/// Filtered by `RUST_LOG`, default `info`. No files are written.
pub fn init_cli() {
    tracing_subscriber::fmt()
        .with_env_filter(filter("info"))
        .with_writer(std::io::stderr)
        .init();
}
