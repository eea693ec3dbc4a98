//! Configuration file support for snapshooting.
//!
//! Loads `~/.snapshooting.toml` (or the file given with `--config`).

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use snapshooting_core::RepositoryDescriptor;

/// The config file name, looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".snapshooting.toml";

pub const SLACK_WEBHOOK_URL_ENV: &str = "SLACK_WEBHOOK_URL";
pub const GITHUB_ACCESS_TOKEN_ENV: &str = "GITHUB_ACCESS_TOKEN";

/// Top-level configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Seconds between snapshot cycles
    pub interval: u64,
    /// Slack incoming webhook; notifications only go to the log without it
    pub slack_webhook_url: Option<String>,
    pub github_access_token: Option<String>,
    /// Override for GitHub Enterprise installations
    pub github_api_url: Option<String>,
    /// Remote snapshot branches are pushed to
    pub remote: Option<String>,
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
}

/// One monitored repository
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    pub local_path: PathBuf,
    pub github: GithubRepo,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
}

impl Config {
    /// Default config location
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(CONFIG_FILE_NAME))
    }

    /// Load and validate configuration.
    ///
    /// A missing or unparsable file, an empty repository list, or a zero
    /// interval is a hard error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "{} must exist. List up local repository directory paths in the file",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.apply_env(|key| std::env::var(key).ok());
        config.validate(path)?;
        Ok(config)
    }

    /// Environment variables win over the file
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SLACK_WEBHOOK_URL_ENV).filter(|v| !v.is_empty()) {
            self.slack_webhook_url = Some(url);
        }
        if let Some(token) = lookup(GITHUB_ACCESS_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.github_access_token = Some(token);
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.repos.is_empty() {
            bail!("{} is empty", path.display());
        }
        if self.interval == 0 {
            bail!("interval in {} must be greater than zero", path.display());
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Repository descriptors with `~/` expanded
    pub fn repositories(&self) -> Vec<RepositoryDescriptor> {
        let home = dirs::home_dir();
        self.repos
            .iter()
            .map(|repo| {
                RepositoryDescriptor::new(
                    expand_home(&repo.local_path, home.as_deref()),
                    repo.github.owner.clone(),
                    repo.github.repo.clone(),
                )
            })
            .collect()
    }
}

fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
