use chrono::{DateTime, Utc};

use crate::azure::service::PullRequestService;
use crate::core::change::has_changed;
use crate::core::report::{BackupReport, UnitFailure};
use crate::store::snapshot::{snapshot_label, SnapshotStore};
use crate::utils::comment_thread::CommentThread;
use crate::utils::error::BackupResult;
use crate::utils::fingerprint::PullRequestFingerprint;
use crate::utils::pull_request::PullRequest;
use crate::utils::snapshot::Snapshot;

pub struct BackupOrchestrator<S: PullRequestService> {
    service: S,
    store: SnapshotStore,
}

impl<S: PullRequestService> BackupOrchestrator<S> {
    pub fn new(service: S, store: SnapshotStore) -> Self {
        Self { service, store }
    }

    pub async fn backup_active_pull_requests(&self) -> BackupResult<BackupReport> {
        self.backup_active_pull_requests_at(Utc::now()).await
    }

    /// One backup run stamped with `run_instant`. Only the initial PR listing
    /// and the final snapshot write can fail the run; everything per PR is
    /// recorded in the report and skipped.
    pub async fn backup_active_pull_requests_at(&self, run_instant: DateTime<Utc>) -> BackupResult<BackupReport> {
        let pull_requests = self.service.list_active_pull_requests().await?;
        let mut report = BackupReport::default();
        if pull_requests.is_empty() {
            log::warn!("[backup_active_pull_requests] No active pull requests returned, nothing to back up");
            return Ok(report);
        }
        log::info!(
            "[backup_active_pull_requests] Backing up {} active pull requests",
            pull_requests.len()
        );

        let previous = self.previous_fingerprints()?;
        for pr in &pull_requests {
            let fingerprint = self.backup_pull_request(pr, &run_instant, &mut report.failures).await;
            report.fingerprints.push(fingerprint);
        }

        if has_changed(&previous, &report.fingerprints) {
            let snapshot = Snapshot::new(
                report.fingerprints.clone(),
                self.store.run_dir(&run_instant).display().to_string(),
            );
            let path = self.store.write(&snapshot, &snapshot_label(&run_instant))?;
            report.snapshot_path = Some(path);
        } else {
            log::info!("[backup_active_pull_requests] No change since last snapshot, snapshot not written");
        }
        if !report.failures.is_empty() {
            log::warn!(
                "[backup_active_pull_requests] {} pull request errors during run",
                report.failures.len()
            );
        }
        report.pull_requests = pull_requests;
        Ok(report)
    }

    fn previous_fingerprints(&self) -> BackupResult<Vec<PullRequestFingerprint>> {
        let previous_opt = self.store.find_latest()?;
        Ok(previous_opt.map(|snapshot| snapshot.pull_requests).unwrap_or_default())
    }

    async fn backup_pull_request(
        &self,
        pr: &PullRequest,
        run_instant: &DateTime<Utc>,
        failures: &mut Vec<UnitFailure>,
    ) -> PullRequestFingerprint {
        let pr_id = pr.id();
        let threads_opt = match self.service.list_comment_threads(pr_id).await {
            Ok(threads) => Some(threads),
            Err(e) => {
                log::error!("[backup_pull_request] Unable to fetch threads for PR {}: {}", pr_id, &e);
                failures.push(UnitFailure { pr_id, error: e });
                None
            }
        };
        let threads: &[CommentThread] = threads_opt.as_deref().unwrap_or(&[]);
        let fingerprint = PullRequestFingerprint::from_pull_request(pr, threads);

        if let Err(e) = self.store.write_artifact(run_instant, &pr_id.to_string(), pr) {
            log::error!("[backup_pull_request] Unable to write PR {} artifact: {}", pr_id, &e);
            failures.push(UnitFailure { pr_id, error: e });
        }
        if threads_opt.is_some() {
            let key = format!("{}/threads", pr_id);
            if let Err(e) = self.store.write_artifact(run_instant, &key, threads) {
                log::error!("[backup_pull_request] Unable to write threads of PR {}: {}", pr_id, &e);
                failures.push(UnitFailure { pr_id, error: e });
            }
        }
        fingerprint
    }
}
