use crate::azure::service::PullRequestService;
use crate::core::report::{RestoreAction, RestoreOutcome, RestoreReport};
use crate::store::snapshot::SnapshotStore;
use crate::utils::error::{BackupError, BackupResult};
use crate::utils::pull_request::PullRequestUpdate;

pub struct RestoreOrchestrator<S: PullRequestService> {
    service: S,
    store: SnapshotStore,
}

impl<S: PullRequestService> RestoreOrchestrator<S> {
    pub fn new(service: S, store: SnapshotStore) -> Self {
        Self { service, store }
    }

    /// Pushes every PR referenced by snapshot `label` back to the remote.
    ///
    /// Fails as a whole only for a missing label or snapshot file; each PR's
    /// result is recorded in the report.
    pub async fn restore_pull_requests(&self, label: Option<&str>) -> BackupResult<RestoreReport> {
        let label = match label.map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => {
                log::error!("[restore_pull_requests] No snapshot label given (RESTORE_STATE_FILE)");
                return Err(BackupError::Configuration(
                    "snapshot label to restore from is not set".to_string(),
                ));
            }
        };
        let snapshot = self.store.read(label).map_err(|e| {
            log::error!("[restore_pull_requests] Unable to read snapshot {}: {}", label, &e);
            e
        })?;
        log::info!(
            "[restore_pull_requests] Restoring {} pull requests from {}",
            snapshot.pull_requests.len(),
            label
        );

        let mut report = RestoreReport {
            label: label.to_string(),
            outcomes: Vec::with_capacity(snapshot.pull_requests.len()),
        };
        for fingerprint in &snapshot.pull_requests {
            let result = self.restore_pull_request(&snapshot.backup_location, fingerprint.id).await;
            match &result {
                Ok(action) => log::info!("[restore_pull_requests] PR {} restored: {:?}", fingerprint.id, action),
                Err(e) => log::error!("[restore_pull_requests] PR {} failed: {}", fingerprint.id, e),
            }
            report.outcomes.push(RestoreOutcome {
                pr_id: fingerprint.id,
                result,
            });
        }
        log::info!(
            "[restore_pull_requests] Done: {} restored, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    /// Update in place when the remote has the PR, otherwise create it from
    /// the stored payload. An inconclusive existence check fails the PR
    /// rather than risking a duplicate create.
    async fn restore_pull_request(&self, backup_location: &str, pr_id: i64) -> BackupResult<RestoreAction> {
        let stored = self.store.read_pull_request_artifact(backup_location, pr_id)?;
        match self.service.get_pull_request(pr_id).await? {
            Some(_) => {
                let update = PullRequestUpdate::from(&stored);
                self.service.update_pull_request(pr_id, &update).await?;
                Ok(RestoreAction::Updated)
            }
            None => {
                let created = self.service.create_pull_request(&stored).await?;
                Ok(RestoreAction::Created { new_id: created.id() })
            }
        }
    }
}
