use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{
    filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::report::SUCCESS_TARGET;

/// Events that belong in the log file: SUCCESS lines and errors.
pub fn is_report(target: &str, level: &Level) -> bool {
    target == SUCCESS_TARGET || *level == Level::ERROR
}

/// Console output follows `RUST_LOG` (default `info`); the log file in `log_dir`
/// only receives report events. Returns the log file path.
pub fn init(log_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    let path = log_dir.join(format!(
        "logfile_{}.log",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    ));
    let file = File::create(&path).context("Failed to create log file")?;

    let console = fmt::layer().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
    );
    let logfile = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(filter_fn(|meta| is_report(meta.target(), meta.level())));

    tracing_subscriber::registry()
        .with(console)
        .with(logfile)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(path)
}
