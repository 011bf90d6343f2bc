use anyhow::Context;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the background log writer alive. Dropping it flushes pending lines.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
    path: Option<PathBuf>,
}

impl LogGuard {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn build_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("info")
            .to_ascii_lowercase();
        EnvFilter::new(level)
    })
}

pub fn log_file_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%dT%H%M%S").to_string();
    log_dir.join(format!("{}.log", timestamp))
}

/// Installs the global subscriber. With `print` set, events go to stderr;
/// otherwise to a timestamped file under `log_dir`, since the terminal UI
/// owns stdout.
pub fn init_tracing(
    level: Option<&str>,
    log_dir: Option<PathBuf>,
    print: bool,
) -> anyhow::Result<LogGuard> {
    let filter = build_filter(level);

    if print {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to install tracing subscriber")?;
        return Ok(LogGuard {
            _worker: None,
            path: None,
        });
    }

    let log_dir = log_dir.unwrap_or_else(|| PathBuf::from("."));
    let log_path = log_file_path(&log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard {
        _worker: Some(guard),
        path: Some(log_path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lands_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path());
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("log"));
    }
}
