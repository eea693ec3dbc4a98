//! In-memory doubles for the external collaborators.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use snapshooting_git::{GitError, VcsBackend, VcsRepository, WorkingTreeStatus};
use snapshooting_github::{GithubError, VisibilityProvider};
use snapshooting_notify::{Notifier, NotifyError, Severity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open(PathBuf),
    Status,
    CurrentBranch,
    CreateBranch(String),
    Stage(String),
    Commit(String),
    Push,
}

impl Call {
    fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::CreateBranch(_) | Call::Stage(_) | Call::Commit(_) | Call::Push
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailPoint {
    Open,
    Status,
    CurrentBranch,
    CreateBranch,
    Stage(String),
    Commit,
    Push,
}

#[derive(Debug, Default)]
struct FakeState {
    status: WorkingTreeStatus,
    branch: String,
    fail_at: Option<FailPoint>,
    calls: Vec<Call>,
    commits: usize,
}

/// Scriptable backend; every repository it opens shares one state
#[derive(Debug, Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let state = FakeState {
            branch: "main".to_string(),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_status(self, status: WorkingTreeStatus) -> Self {
        self.state.lock().unwrap().status = status;
        self
    }

    pub fn on_branch(self, branch: &str) -> Self {
        self.state.lock().unwrap().branch = branch.to_string();
        self
    }

    pub fn failing_at(self, point: FailPoint) -> Self {
        self.state.lock().unwrap().fail_at = Some(point);
        self
    }

    pub fn open_fake(&self) -> FakeRepository {
        FakeRepository {
            state: self.state.clone(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change repository state
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn branch_creations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateBranch(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn current_branch(&self) -> String {
        self.state.lock().unwrap().branch.clone()
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }
}

impl VcsBackend for FakeBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn VcsRepository>, GitError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Open(path.to_path_buf()));
        if state.fail_at == Some(FailPoint::Open) {
            return Err(GitError::Backend(format!(
                "repository does not exist: {}",
                path.display()
            )));
        }
        drop(state);
        Ok(Box::new(self.open_fake()))
    }
}

pub struct FakeRepository {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRepository {
    fn record(&self, call: Call, point: FailPoint, what: &str) -> Result<(), GitError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_at.as_ref() == Some(&point) {
            return Err(GitError::Backend(format!("{} failed: simulated error", what)));
        }
        Ok(())
    }
}

impl VcsRepository for FakeRepository {
    fn status(&self) -> Result<WorkingTreeStatus, GitError> {
        self.record(Call::Status, FailPoint::Status, "status")?;
        Ok(self.state.lock().unwrap().status.clone())
    }

    fn current_branch_name(&self) -> Result<String, GitError> {
        self.record(Call::CurrentBranch, FailPoint::CurrentBranch, "reading HEAD")?;
        Ok(self.state.lock().unwrap().branch.clone())
    }

    fn create_and_checkout_branch(&mut self, name: &str) -> Result<(), GitError> {
        self.record(
            Call::CreateBranch(name.to_string()),
            FailPoint::CreateBranch,
            "checkout",
        )?;
        self.state.lock().unwrap().branch = name.to_string();
        Ok(())
    }

    fn stage_path(&mut self, path: &str) -> Result<(), GitError> {
        self.record(
            Call::Stage(path.to_string()),
            FailPoint::Stage(path.to_string()),
            "stage",
        )
    }

    fn commit(&mut self, message: &str) -> Result<String, GitError> {
        self.record(Call::Commit(message.to_string()), FailPoint::Commit, "commit")?;
        let mut state = self.state.lock().unwrap();
        state.commits += 1;
        Ok(format!("{:040x}", state.commits))
    }

    fn push(&mut self) -> Result<(), GitError> {
        self.record(Call::Push, FailPoint::Push, "push")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub at: tokio::time::Instant,
}

/// Records notifications; can fail, stall, or cancel a token after N calls
#[derive(Debug, Clone, Default)]
pub struct FakeNotifier {
    sent: Arc<Mutex<Vec<Sent>>>,
    fail: bool,
    delay: Option<Duration>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn cancel_after(mut self, count: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((count, token));
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(
        &self,
        severity: Severity,
        title: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let count = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(Sent {
                severity,
                title: title.to_string(),
                body: body.to_string(),
                at: tokio::time::Instant::now(),
            });
            sent.len()
        };

        if let Some((limit, token)) = &self.cancel_after {
            if count >= *limit {
                token.cancel();
            }
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 500,
                body: "webhook down".to_string(),
            });
        }
        Ok(())
    }
}

/// Visibility answers keyed by `owner/repo`; unknown repositories are errors
#[derive(Debug, Clone, Default)]
pub struct FakeVisibility {
    private: HashMap<String, bool>,
}

impl FakeVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, owner: &str, repo: &str, private: bool) -> Self {
        self.private.insert(format!("{}/{}", owner, repo), private);
        self
    }
}

#[async_trait]
impl VisibilityProvider for FakeVisibility {
    async fn is_private(&self, owner: &str, repo: &str) -> Result<bool, GithubError> {
        self.private
            .get(&format!("{}/{}", owner, repo))
            .copied()
            .ok_or_else(|| GithubError::Api {
                owner: owner.to_string(),
                repo: repo.to_string(),
                status: 404,
                message: "Not Found".to_string(),
            })
    }
}
