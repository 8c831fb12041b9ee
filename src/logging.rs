use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

pub(crate) const LOG_ENV: &str = "BUDGETDASH_LOG";
const LOG_FILE_NAME: &str = "budgetdash.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogTarget {
    File,
    Stderr,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum LoggingError {
    #[error("No suitable data directory available for logs")]
    NoDataDir,
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber. The returned guard flushes the file
/// writer on drop and must be held for the life of the program.
pub(crate) fn init(target: LogTarget) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = build_env_filter();
    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
            tracing::subscriber::set_global_default(Registry::default().with(filter).with(layer))?;
            Ok(None)
        }
        LogTarget::File => {
            let dir = log_directory()?;
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            tracing::subscriber::set_global_default(Registry::default().with(filter).with(layer))?;
            tracing::info!("Logging to {}", dir.join(LOG_FILE_NAME).display());
            Ok(Some(guard))
        }
    }
}

pub(crate) fn log_directory() -> Result<PathBuf, LoggingError> {
    let dirs = crate::config::project_dirs().ok_or(LoggingError::NoDataDir)?;
    ensure_dir(&dirs.data_dir().join("logs"))
}

fn ensure_dir(path: &Path) -> Result<PathBuf, LoggingError> {
    std::fs::create_dir_all(path).map_err(|source| LoggingError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}
