use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::UNIX_EPOCH;

use crate::utils::comment_thread::{latest_thread_update, CommentThread};
use crate::utils::pull_request::PullRequest;

/// Minimal per-PR signal used to decide whether a new snapshot is needed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestFingerprint {
    pub id: i64,
    #[serde(rename = "lastMergeCommitTimestamp", default = "epoch")]
    pub last_merge_commit: DateTime<Utc>,
    #[serde(rename = "threadLastUpdatedTimestamp", default = "epoch")]
    pub thread_last_updated: DateTime<Utc>,
}

pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from(UNIX_EPOCH)
}

impl PullRequestFingerprint {
    pub fn new(id: i64, last_merge_commit: DateTime<Utc>, thread_last_updated: DateTime<Utc>) -> Self {
        Self {
            id,
            last_merge_commit,
            thread_last_updated,
        }
    }

    /// Absent dates fall back to the Unix epoch.
    pub fn from_pull_request(pr: &PullRequest, threads: &[CommentThread]) -> Self {
        Self::new(
            pr.id(),
            pr.last_merge_commit_date().unwrap_or_else(epoch),
            latest_thread_update(threads).unwrap_or_else(epoch),
        )
    }
}
