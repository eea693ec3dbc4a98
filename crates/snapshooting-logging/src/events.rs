use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Structured log events for the snapshot daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    TargetRegistered {
        path: PathBuf,
    },
    SchedulerStarted {
        interval_secs: u64,
        repositories: usize,
    },
    OneShotStarted {
        repositories: usize,
    },
    SnapshotStarted {
        repo: String,
    },
    NoChange {
        repo: String,
    },
    UntrackedFilesPresent {
        repo: String,
        paths: Vec<String>,
    },
    BranchCreated {
        repo: String,
        branch: String,
    },
    Pushed {
        repo: String,
        branch: String,
        commit_message: String,
    },
    SnapshotFailed {
        repo: String,
        error: String,
    },
    NotificationFailed {
        repo: String,
        error: String,
    },
    Interrupted,
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for snapshot events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogFormat::default())
    }
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON lines
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let _ = writeln!(file, "{}", event.with_timestamp());
            }
        }

        let line = match self.format {
            LogFormat::Json => serde_json::to_string(event).ok(),
            LogFormat::Pretty => Some(Self::render_pretty(event)),
            LogFormat::Compact => Some(Self::render_compact(event)),
        };
        if let Some(line) = line {
            let _ = writeln!(std::io::stderr(), "{}", line);
        }
    }

    fn render_pretty(event: &LogEvent) -> String {
        match event {
            LogEvent::TargetRegistered { path } => {
                format!("{} target: {}", "•".dimmed(), path.display())
            }
            LogEvent::SchedulerStarted {
                interval_secs,
                repositories,
            } => format!(
                "{} {} (interval: {} sec, {} {})",
                "▶".bright_blue(),
                "snapshooting start".bold(),
                interval_secs,
                repositories,
                plural(*repositories, "repository", "repositories")
            ),
            LogEvent::OneShotStarted { repositories } => format!(
                "{} {} ({} {})",
                "▶".bright_blue(),
                "snapshooting for oneshot".bold(),
                repositories,
                plural(*repositories, "repository", "repositories")
            ),
            LogEvent::SnapshotStarted { repo } => {
                format!("{} Snapshooting...", tag(repo).bright_cyan())
            }
            LogEvent::NoChange { repo } => {
                format!("{} {}", tag(repo).bright_cyan(), "No changes.".dimmed())
            }
            LogEvent::UntrackedFilesPresent { repo, paths } => format!(
                "{} {} Untracked {}: {}",
                tag(repo).bright_cyan(),
                "⚠".bright_yellow(),
                plural(paths.len(), "file", "files"),
                paths.join(", ").bright_yellow()
            ),
            LogEvent::BranchCreated { repo, branch } => format!(
                "{} Created branch {}",
                tag(repo).bright_cyan(),
                branch.bold()
            ),
            LogEvent::Pushed {
                repo,
                branch,
                commit_message,
            } => format!(
                "{} {} Pushed {} to {}",
                tag(repo).bright_cyan(),
                "✓".bright_green(),
                commit_message,
                branch.bold()
            ),
            LogEvent::SnapshotFailed { repo, error } => format!(
                "{} {} Unexpected error: {}",
                tag(repo).bright_cyan(),
                "✗".bright_red(),
                error.bright_red()
            ),
            LogEvent::NotificationFailed { repo, error } => format!(
                "{} {} Notification failed: {}",
                tag(repo).bright_cyan(),
                "✗".bright_red(),
                error
            ),
            LogEvent::Interrupted => {
                format!("{} snapshooting: interrupt. terminating...", "■".bright_yellow())
            }
        }
    }

    fn render_compact(event: &LogEvent) -> String {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::TargetRegistered { path } => format!("target {}", path.display()),
            LogEvent::SchedulerStarted {
                interval_secs,
                repositories,
            } => format!("loop:start interval={}s repos={}", interval_secs, repositories),
            LogEvent::OneShotStarted { repositories } => {
                format!("oneshot:start repos={}", repositories)
            }
            LogEvent::SnapshotStarted { repo } => format!("{}:start", repo),
            LogEvent::NoChange { repo } => format!("{}:no-change", repo),
            LogEvent::UntrackedFilesPresent { repo, paths } => {
                format!("{}:untracked {}", repo, paths.join(","))
            }
            LogEvent::BranchCreated { repo, branch } => format!("{}:branch {}", repo, branch),
            LogEvent::Pushed {
                repo,
                branch,
                commit_message,
            } => format!("{}:pushed {} {}", repo, branch, commit_message),
            LogEvent::SnapshotFailed { repo, error } => format!("{}:error {}", repo, error),
            LogEvent::NotificationFailed { repo, error } => {
                format!("{}:notify-error {}", repo, error)
            }
            LogEvent::Interrupted => "interrupt".to_string(),
        };
        format!("[{}] {}", timestamp, msg)
    }
}

fn tag(repo: &str) -> String {
    format!("[{}]", repo)
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
