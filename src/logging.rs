use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `NOTAS_LOG=debug`.
pub const LOG_ENV: &str = "NOTAS_LOG";
const DEFAULT_LOG_NAME: &str = "notas-ia.log";

pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOG_NAME)
}

/// Install a file-backed subscriber. The terminal belongs to the UI, so
/// nothing is ever logged to stdout or stderr. Failure leaves logging off.
pub fn init(log_file: &Path) -> Option<WorkerGuard> {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = log_file.file_name()?.to_string_lossy().into_owned();

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        // A global subscriber is already installed; drop the guard so the writer shuts down.
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path() {
        let path = default_log_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("notas-ia.log"));
    }

    #[test]
    fn test_init_with_unusable_directory_leaves_logging_off() {
        // A regular file cannot serve as the log directory.
        let file = tempfile::NamedTempFile::new().unwrap();
        let log_file = file.path().join("notas-ia.log");
        assert!(init(&log_file).is_none());
    }
}
