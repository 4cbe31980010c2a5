use std::sync::Arc;

use async_trait::async_trait;

use crate::azure::client::AzureDevOpsClient;
use crate::utils::comment_thread::CommentThread;
use crate::utils::error::BackupResult;
use crate::utils::pull_request::{PullRequest, PullRequestUpdate};

/// Pull request operations the backup and restore runs need from the remote.
#[async_trait]
pub trait PullRequestService: Send + Sync {
    async fn list_active_pull_requests(&self) -> BackupResult<Vec<PullRequest>>;

    /// `Ok(None)` only when the remote confirms the PR does not exist.
    async fn get_pull_request(&self, pr_id: i64) -> BackupResult<Option<PullRequest>>;

    async fn list_comment_threads(&self, pr_id: i64) -> BackupResult<Vec<CommentThread>>;

    async fn create_pull_request(&self, pr: &PullRequest) -> BackupResult<PullRequest>;

    async fn update_pull_request(&self, pr_id: i64, update: &PullRequestUpdate) -> BackupResult<PullRequest>;
}

#[async_trait]
impl<T: PullRequestService + ?Sized> PullRequestService for Arc<T> {
    async fn list_active_pull_requests(&self) -> BackupResult<Vec<PullRequest>> {
        (**self).list_active_pull_requests().await
    }

    async fn get_pull_request(&self, pr_id: i64) -> BackupResult<Option<PullRequest>> {
        (**self).get_pull_request(pr_id).await
    }

    async fn list_comment_threads(&self, pr_id: i64) -> BackupResult<Vec<CommentThread>> {
        (**self).list_comment_threads(pr_id).await
    }

    async fn create_pull_request(&self, pr: &PullRequest) -> BackupResult<PullRequest> {
        (**self).create_pull_request(pr).await
    }

    async fn update_pull_request(&self, pr_id: i64, update: &PullRequestUpdate) -> BackupResult<PullRequest> {
        (**self).update_pull_request(pr_id, update).await
    }
}

#[async_trait]
impl PullRequestService for AzureDevOpsClient {
    async fn list_active_pull_requests(&self) -> BackupResult<Vec<PullRequest>> {
        self.list_active_prs_azure().await
    }

    async fn get_pull_request(&self, pr_id: i64) -> BackupResult<Option<PullRequest>> {
        self.get_pr_info_azure(pr_id).await
    }

    async fn list_comment_threads(&self, pr_id: i64) -> BackupResult<Vec<CommentThread>> {
        self.list_comment_threads_azure(pr_id).await
    }

    async fn create_pull_request(&self, pr: &PullRequest) -> BackupResult<PullRequest> {
        self.create_pr_azure(pr).await
    }

    async fn update_pull_request(&self, pr_id: i64, update: &PullRequestUpdate) -> BackupResult<PullRequest> {
        self.update_pr_azure(pr_id, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_relative_to_repository() {
        let client = AzureDevOpsClient::with_http_client(
            reqwest::Client::new(),
            "https://dev.azure.com/contoso/_apis/git/repositories/web".to_string(),
        );
        assert_eq!(
            client.pull_requests_url(),
            "https://dev.azure.com/contoso/_apis/git/repositories/web/pullrequests"
        );
        assert_eq!(
            client.pull_request_url(42),
            "https://dev.azure.com/contoso/_apis/git/repositories/web/pullrequests/42"
        );
    }
}
