#![forbid(unsafe_code)]

//! File-backed tracing output.
//!
//! The terminal belongs to the UI, so log events only go anywhere when a log
//! file is configured. The filter comes from `ASSET_HUNTER_LOG` and defaults
//! to `info`.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "ASSET_HUNTER_LOG";

#[derive(Debug)]
pub enum LogInitError {
    Io { path: PathBuf, source: std::io::Error },
    /// A global subscriber was already installed.
    AlreadyInstalled(String),
}

impl fmt::Display for LogInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogInitError::Io { path, source } => {
                write!(f, "failed to open log file {}: {source}", path.display())
            }
            LogInitError::AlreadyInstalled(msg) => {
                write!(f, "failed to install log subscriber: {msg}")
            }
        }
    }
}

impl std::error::Error for LogInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogInitError::Io { source, .. } => Some(source),
            LogInitError::AlreadyInstalled(_) => None,
        }
    }
}

/// Filter from `ASSET_HUNTER_LOG`, or `info` when unset or unparsable.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Open `path` for appending.
pub fn open_log_file(path: &Path) -> Result<File, LogInitError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogInitError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Install the global subscriber writing plain text to `path`.
pub fn init(path: &Path) -> Result<(), LogInitError> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| LogInitError::AlreadyInstalled(e.to_string()))?;
    tracing::info!(
        target: "asset_hunter",
        path = %path.display(),
        version = env!("CARGO_PKG_VERSION"),
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_file_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ah.log");
        {
            use std::io::Write;
            let mut f = open_log_file(&path).unwrap();
            writeln!(f, "one").unwrap();
        }
        {
            use std::io::Write;
            let mut f = open_log_file(&path).unwrap();
            writeln!(f, "two").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn open_log_file_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("ah.log");
        let err = open_log_file(&path).unwrap_err();
        assert!(err.to_string().contains("ah.log"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
