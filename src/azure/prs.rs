use reqwest::Method;

use crate::azure::client::AzureDevOpsClient;
use crate::utils::error::{BackupError, BackupResult};
use crate::utils::pull_request::{ListResponse, PullRequest, PullRequestUpdate};

const ACTIVE_STATUS: &str = "active";

impl AzureDevOpsClient {
    pub async fn list_prs_azure(&self, status: &str) -> BackupResult<Vec<PullRequest>> {
        let url = self.pull_requests_url();
        let list_opt = self
            .get_json::<ListResponse<PullRequest>>(&url, &[("searchCriteria.status", status)])
            .await?;
        let Some(list) = list_opt else {
            log::error!("[list_prs_azure] Repository {} not found", self.repository_url());
            return Err(BackupError::remote_fetch(url, "repository not found"));
        };
        let prs = list.into_values();
        log::info!("[list_prs_azure] {} pull requests with status {}", prs.len(), status);
        Ok(prs)
    }

    pub async fn list_active_prs_azure(&self) -> BackupResult<Vec<PullRequest>> {
        self.list_prs_azure(ACTIVE_STATUS).await
    }

    pub async fn get_pr_info_azure(&self, pr_id: i64) -> BackupResult<Option<PullRequest>> {
        let url = self.pull_request_url(pr_id);
        self.get_json::<PullRequest>(&url, &[]).await
    }

    pub async fn create_pr_azure(&self, pr: &PullRequest) -> BackupResult<PullRequest> {
        let url = self.pull_requests_url();
        let created: PullRequest = self.send_json(Method::POST, &url, pr).await?;
        log::info!(
            "[create_pr_azure] Created PR {} from backup of PR {}",
            created.id(),
            pr.id()
        );
        Ok(created)
    }

    pub async fn update_pr_azure(&self, pr_id: i64, update: &PullRequestUpdate) -> BackupResult<PullRequest> {
        let url = self.pull_request_url(pr_id);
        let updated: PullRequest = self.send_json(Method::PATCH, &url, update).await?;
        log::info!("[update_pr_azure] Updated PR {}", pr_id);
        Ok(updated)
    }
}
