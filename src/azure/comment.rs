use crate::azure::client::AzureDevOpsClient;
use crate::utils::comment_thread::CommentThread;
use crate::utils::error::BackupResult;
use crate::utils::pull_request::ListResponse;

impl AzureDevOpsClient {
    /// Threads for one PR. A 404 means the PR has no reachable threads and
    /// yields an empty list.
    pub async fn list_comment_threads_azure(&self, pr_id: i64) -> BackupResult<Vec<CommentThread>> {
        let url = format!("{}/threads", self.pull_request_url(pr_id));
        let list_opt = self.get_json::<ListResponse<CommentThread>>(&url, &[]).await?;
        let threads = list_opt.map(ListResponse::into_values).unwrap_or_default();
        log::debug!("[list_comment_threads_azure] PR {} has {} threads", pr_id, threads.len());
        Ok(threads)
    }
}
