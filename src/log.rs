// Diagnostic logging. This is separate from the audit log: it records what the
// program itself did, as bunyan JSON, in a timestamped file per run.

use crate::errors::{Result, ShellError, ShellErrorType};
use crate::locations::get_log_dir;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

const MAX_LOG_AGE_DAYS: i64 = 30;

pub fn init_logging(debug: bool) -> Result<WorkerGuard> {
    let log_file = get_log_location()?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let default_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let formatter = BunyanFormattingLayer::new("vshell".into(), non_blocking);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatter);
    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        ShellError::new(
            ShellErrorType::ConfigError,
            format!("Failed to install log subscriber: {}", e),
        )
    })?;
    tracing_log::LogTracer::init().map_err(|e| {
        ShellError::new(
            ShellErrorType::ConfigError,
            format!("Failed to bridge log records: {}", e),
        )
    })?;

    Ok(guard)
}

fn get_log_location() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    clean_logfiles(&log_dir)?;
    let timestamp = Utc::now().format("%Y-%m-%d-%H-%M-%S");
    Ok(log_dir.join(format!("vshell-{}.log", timestamp)))
}

fn clean_logfiles(log_dir: &Path) -> Result<()> {
    // Logfiles from more than 30 days ago are deleted
    for file in std::fs::read_dir(log_dir)? {
        let file = file?;
        let modified: chrono::DateTime<Utc> = file.metadata()?.modified()?.into();
        if Utc::now().signed_duration_since(modified).num_days() > MAX_LOG_AGE_DAYS {
            std::fs::remove_file(file.path())?;
        }
    }
    Ok(())
}
