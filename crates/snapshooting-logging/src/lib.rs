//! # snapshooting-logging
//!
//! Logging for the snapshooting daemon.
//!
//! ## Key Types
//!
//! - [`Logger`] - Structured event logging to stderr and an optional file
//! - [`LogEvent`] - Log event types
//! - [`LogFormat`] - Output formats (Pretty, JSON, Compact)
//!
//! Diagnostic detail goes through `tracing`; [`init_tracing`] installs the
//! subscriber, optionally mirroring it to a file through a non-blocking
//! `tracing-appender` writer.

mod events;

pub use events::{LogEvent, LogFormat, Logger};

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for the application.
///
/// When `trace_file` is set, diagnostics are also appended to it as plain
/// text. The returned guard flushes the file writer on drop and must be held
/// until the program exits.
pub fn init_tracing(
    level: &str,
    format: LogFormat,
    trace_file: Option<&Path>,
) -> io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, guard) = match trace_file {
        Some(path) => {
            let (writer, guard) = trace_file_writer(path)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false).with_writer(std::io::stderr))
                .with(writer.map(|w| fmt::layer().with_ansi(false).with_target(false).with_writer(w)))
                .init();
        }
        LogFormat::Pretty | LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .with(writer.map(|w| fmt::layer().with_ansi(false).with_target(false).with_writer(w)))
                .init();
        }
    }

    Ok(guard)
}

/// Open `path` for appending behind a background writer thread
pub fn trace_file_writer(path: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(tracing_appender::non_blocking(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_trace_file_receives_events() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("trace.log");

        let (writer, guard) = trace_file_writer(&path).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_target(false).with_writer(writer));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(repo = "notes", "untracked files present");
        });
        drop(guard);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("WARN"));
        assert!(contents.contains("untracked files present"));
        assert!(contents.contains("notes"));
    }

    #[test]
    fn test_trace_file_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.log");
        fs::write(&path, "earlier run\n").unwrap();

        let (writer, guard) = trace_file_writer(&path).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(writer));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("scheduler started");
        });
        drop(guard);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier run\n"));
        assert!(contents.contains("scheduler started"));
    }

    #[test]
    fn test_trace_file_rejects_directory() {
        let dir = TempDir::new().unwrap();
        assert!(trace_file_writer(dir.path()).is_err());
    }
}
