use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use snapshooting_logging::{LogEvent, Logger};

use crate::error::StartupError;
use crate::outcome::SnapshotOutcome;
use crate::{RepositoryDescriptor, RepositorySnapshotter};

/// Per-outcome counts for one pass over the repositories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub pushed: usize,
    pub unchanged: usize,
    pub blocked: usize,
    pub failed: usize,
}

/// Drives the snapshotter over every repository, once or on an interval
pub struct Scheduler {
    snapshotter: RepositorySnapshotter,
    repositories: Vec<RepositoryDescriptor>,
    interval: Duration,
    logger: Arc<Logger>,
}

impl Scheduler {
    pub fn new(
        snapshotter: RepositorySnapshotter,
        repositories: Vec<RepositoryDescriptor>,
        interval: Duration,
        logger: Arc<Logger>,
    ) -> Result<Self, StartupError> {
        if repositories.is_empty() {
            return Err(StartupError::NoRepositories);
        }
        if interval.is_zero() {
            return Err(StartupError::InvalidInterval);
        }
        Ok(Self {
            snapshotter,
            repositories,
            interval,
            logger,
        })
    }

    pub fn repositories(&self) -> &[RepositoryDescriptor] {
        &self.repositories
    }

    /// Snapshot every repository once, sequentially. A failing repository
    /// never stops the pass.
    pub async fn run_once(&self) -> CycleSummary {
        let mut summary = CycleSummary::default();

        for repo in &self.repositories {
            let name = repo.base_name();
            self.logger.log(&LogEvent::SnapshotStarted { repo: name.clone() });

            match self.snapshotter.snapshot(repo, Local::now()).await {
                Ok(SnapshotOutcome::NoChange) => summary.unchanged += 1,
                Ok(SnapshotOutcome::UntrackedFilesPresent(_)) => summary.blocked += 1,
                Ok(SnapshotOutcome::Success { .. }) => summary.pushed += 1,
                Ok(SnapshotOutcome::UnexpectedFailure(e)) => {
                    summary.failed += 1;
                    error!(repo = %name, error = %e, "unexpected error happened");
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(repo = %name, error = %e, "notification could not be delivered");
                    self.logger.log(&LogEvent::NotificationFailed {
                        repo: name,
                        error: e.to_string(),
                    });
                }
            }
        }

        debug!(?summary, "Cycle finished");
        summary
    }

    /// Snapshot every repository on each tick until `shutdown` is cancelled.
    ///
    /// The first cycle runs one interval after start. Cycles never overlap: a
    /// cycle that overruns the interval delays the next one, which then starts
    /// right away. Cancellation is only observed between cycles.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.logger.log(&LogEvent::SchedulerStarted {
            interval_secs: self.interval.as_secs(),
            repositories: self.repositories.len(),
        });

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, stopping scheduler");
                    self.logger.log(&LogEvent::Interrupted);
                    return;
                }
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }
    }
}
