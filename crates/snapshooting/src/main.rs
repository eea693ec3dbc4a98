mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::info;

use snapshooting_core::{validate_repositories, RepositorySnapshotter, Scheduler};
use snapshooting_git::{Git2Backend, VcsBackend, DEFAULT_REMOTE};
use snapshooting_github::{GithubClient, DEFAULT_API_URL};
use snapshooting_logging::{init_tracing, LogEvent, LogFormat, Logger};
use snapshooting_notify::{LogNotifier, Notifier, SlackNotifier};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "snapshooting",
    about = "Periodically commit and push work-in-progress to snapshot branches",
    version,
    author
)]
struct Cli {
    /// Run a single pass over all repositories and exit
    #[arg(long)]
    oneshot: bool,

    /// Path to the config file (default: ~/.snapshooting.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatChoice,

    /// Tracing filter, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Also append events as JSON lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Also write tracing diagnostics to this file
    #[arg(long)]
    trace_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.into();
    let _trace_guard = init_tracing(&cli.log_level, log_format, cli.trace_file.as_deref())
        .context("Failed to open trace file")?;

    let logger = match &cli.log_file {
        Some(path) => Logger::with_file(log_format, path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?,
        None => Logger::new(log_format),
    };
    let logger = Arc::new(logger);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;
    let repositories = config.repositories();

    let backend: Arc<dyn VcsBackend> = Arc::new(
        Git2Backend::new().with_remote(config.remote.as_deref().unwrap_or(DEFAULT_REMOTE)),
    );
    let github = GithubClient::with_api_url(
        config.github_access_token.as_deref(),
        config.github_api_url.as_deref().unwrap_or(DEFAULT_API_URL),
    )
    .context("Failed to create GitHub client")?;

    validate_repositories(&repositories, backend.as_ref(), &github)
        .await
        .context("Repository validation failed")?;

    let notifier: Arc<dyn Notifier> = match config.slack_webhook_url.as_deref() {
        Some(url) => Arc::new(SlackNotifier::new(url).context("Failed to create Slack client")?),
        None => {
            info!("No Slack webhook configured, notifications go to the log only");
            Arc::new(LogNotifier)
        }
    };

    for repo in &repositories {
        logger.log(&LogEvent::TargetRegistered {
            path: repo.local_path.clone(),
        });
    }

    let snapshotter = RepositorySnapshotter::new(backend, notifier, logger.clone());
    let scheduler = Scheduler::new(snapshotter, repositories, config.interval(), logger.clone())?;

    if cli.oneshot {
        logger.log(&LogEvent::OneShotStarted {
            repositories: scheduler.repositories().len(),
        });
        scheduler.run_once().await;
        return Ok(());
    }

    // Handle Ctrl+C / SIGTERM by stopping the scheduler between cycles
    let shutdown = CancellationToken::new();
    let handle = shutdown.clone();
    ctrlc::set_handler(move || handle.cancel()).context("Failed to set Ctrl+C handler")?;

    scheduler.run(shutdown).await;
    Ok(())
}
