use serde::{Deserialize, Serialize};

use crate::utils::fingerprint::PullRequestFingerprint;

/// Point-in-time state of the repository's active pull requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub pull_requests: Vec<PullRequestFingerprint>,
    #[serde(default)]
    pub backup_location: String,
}

/// On-disk forms a snapshot file may take. Older files hold only the bare
/// fingerprint array.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Full(Snapshot),
    Legacy(Vec<PullRequestFingerprint>),
}

impl Snapshot {
    pub fn new(pull_requests: Vec<PullRequestFingerprint>, backup_location: String) -> Self {
        Self {
            pull_requests,
            backup_location,
        }
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        let file: SnapshotFile = serde_json::from_slice(bytes)?;
        Ok(match file {
            SnapshotFile::Full(snapshot) => snapshot,
            SnapshotFile::Legacy(pull_requests) => Snapshot::new(pull_requests, String::new()),
        })
    }
}
