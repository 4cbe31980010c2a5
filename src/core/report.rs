use std::path::PathBuf;

use crate::utils::error::BackupError;
use crate::utils::fingerprint::PullRequestFingerprint;
use crate::utils::pull_request::PullRequest;

/// An error contained to one pull request.
#[derive(Debug)]
pub struct UnitFailure {
    pub pr_id: i64,
    pub error: BackupError,
}

#[derive(Debug, Default)]
pub struct BackupReport {
    /// Pull requests exactly as fetched.
    pub pull_requests: Vec<PullRequest>,
    pub fingerprints: Vec<PullRequestFingerprint>,
    /// Set only when a new snapshot file was written.
    pub snapshot_path: Option<PathBuf>,
    pub failures: Vec<UnitFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreAction {
    Created { new_id: i64 },
    Updated,
}

#[derive(Debug)]
pub struct RestoreOutcome {
    pub pr_id: i64,
    pub result: Result<RestoreAction, BackupError>,
}

#[derive(Debug, Default)]
pub struct RestoreReport {
    pub label: String,
    pub outcomes: Vec<RestoreOutcome>,
}

impl RestoreReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn action_for(&self, pr_id: i64) -> Option<&Result<RestoreAction, BackupError>> {
        self.outcomes.iter().find(|o| o.pr_id == pr_id).map(|o| &o.result)
    }
}
