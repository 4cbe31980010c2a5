use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Typed view over an Azure DevOps `GitPullRequest` payload.
///
/// Only the fields the backup and restore paths read are named; everything
/// else the remote sends is kept in `extra` so that a stored artifact is the
/// full payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ref_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_merge_commit: Option<GitCommitRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<GitUserDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitUserDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PullRequest {
    pub fn id(&self) -> i64 {
        self.pull_request_id
    }

    /// Author date of the last merge commit, if the remote recorded one.
    pub fn last_merge_commit_date(&self) -> Option<DateTime<Utc>> {
        self.last_merge_commit
            .as_ref()
            .and_then(|commit| commit.author.as_ref())
            .and_then(|author| author.date)
    }
}

/// The mutable subset accepted by `PATCH pullrequests/{id}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&PullRequest> for PullRequestUpdate {
    fn from(pr: &PullRequest) -> Self {
        PullRequestUpdate {
            title: pr.title.clone(),
            description: pr.description.clone(),
        }
    }
}

/// Envelope used by Azure DevOps list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub value: Option<Vec<T>>,
}

impl<T> ListResponse<T> {
    pub fn into_values(self) -> Vec<T> {
        self.value.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pull_request_keeps_unknown_fields() {
        let raw = json!({
            "pullRequestId": 7,
            "title": "Add retries",
            "description": "body",
            "status": "active",
            "codeReviewId": 7,
            "reviewers": [{"displayName": "Ada", "vote": 10}],
            "lastMergeCommit": {
                "commitId": "abc123",
                "author": {"name": "Ada", "date": "2024-03-01T10:15:00Z"}
            }
        });
        let pr: PullRequest = serde_json::from_value(raw.clone()).expect("parse pr");
        assert_eq!(pr.id(), 7);
        assert_eq!(
            pr.last_merge_commit_date().map(|d| d.to_rfc3339()),
            Some("2024-03-01T10:15:00+00:00".to_string())
        );
        assert_eq!(serde_json::to_value(&pr).expect("serialize pr"), raw);
    }

    #[test]
    fn test_pull_request_without_merge_commit() {
        let pr: PullRequest = serde_json::from_value(json!({"pullRequestId": 3})).expect("parse pr");
        assert!(pr.last_merge_commit_date().is_none());
    }

    #[test]
    fn test_update_carries_only_title_and_description() {
        let pr: PullRequest = serde_json::from_value(json!({
            "pullRequestId": 42,
            "title": "t",
            "description": "d",
            "status": "active",
            "reviewers": []
        }))
        .expect("parse pr");
        let update = PullRequestUpdate::from(&pr);
        assert_eq!(
            serde_json::to_value(&update).expect("serialize update"),
            json!({"title": "t", "description": "d"})
        );
    }

    #[test]
    fn test_list_response_with_null_value() {
        let list: ListResponse<PullRequest> =
            serde_json::from_value(json!({"count": 0, "value": null})).expect("parse list");
        assert!(list.into_values().is_empty());
    }

    #[test]
    fn test_list_response_without_value() {
        let list: ListResponse<PullRequest> =
            serde_json::from_value(json!({"count": 0})).expect("parse list");
        assert!(list.into_values().is_empty());
    }
}
