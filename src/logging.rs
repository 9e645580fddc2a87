use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init_tracing(app_data_dir: &Path) -> AppResult<PathBuf> {
    let log_dir = app_data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "tracker.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| AppError::Internal(error.to_string()))?;

    Ok(log_dir)
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn creates_log_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_dir = init_tracing(dir.path()).expect("init tracing");
        assert!(log_dir.is_dir());
        tracing::info!(test = "logging", "tracing initialized");
    }
}
