use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utils::error::{BackupError, BackupResult};
use crate::utils::pull_request::PullRequest;
use crate::utils::snapshot::Snapshot;

const SNAPSHOT_LABEL_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
const JSON_EXTENSION: &str = "json";

/// File-system store rooted at the configured backup directory.
///
/// Layout:
/// - `{root}/{%Y-%m-%d-%H-%M-%S}.json` snapshot files
/// - `{root}/{run_epoch}/{pr_id}.json` raw pull request payloads
/// - `{root}/{run_epoch}/{pr_id}/threads.json` raw comment thread batches
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

/// Snapshot file label for a run, sortable as a string in wall-clock order.
pub fn snapshot_label(instant: &DateTime<Utc>) -> String {
    instant.format(SNAPSHOT_LABEL_FORMAT).to_string()
}

/// Name of the run-scoped artifact directory.
pub fn run_label(instant: &DateTime<Utc>) -> String {
    instant.timestamp().to_string()
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn run_dir(&self, run_instant: &DateTime<Utc>) -> PathBuf {
        self.root.join(run_label(run_instant))
    }

    /// Latest readable snapshot by file name order; `None` when the root is
    /// missing or holds no readable snapshot files. Files that do not parse
    /// are skipped with a warning.
    pub fn find_latest(&self) -> BackupResult<Option<Snapshot>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("[find_latest] Backup root {:?} does not exist yet", &self.root);
                return Ok(None);
            }
            Err(e) => return Err(BackupError::storage("listing snapshots", &self.root, e)),
        };
        let mut names = Vec::new();
        for entry_res in entries {
            let entry = entry_res.map_err(|e| BackupError::storage("reading dir entry", &self.root, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| BackupError::storage("reading file type", entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        for name in names.iter().rev() {
            let path = self.root.join(name);
            match read_snapshot_file(&path) {
                Ok(snapshot) => {
                    log::debug!("[find_latest] Latest snapshot is {:?}", &path);
                    return Ok(Some(snapshot));
                }
                Err(BackupError::Serialization { path, source }) => {
                    log::warn!(
                        "[find_latest] Skipping unreadable snapshot {:?}, remove it from the backup root: {}",
                        path,
                        source
                    );
                }
                Err(e) => return Err(e),
            }
        }
        log::info!("[find_latest] No snapshot files in {:?}", &self.root);
        Ok(None)
    }

    /// Reads the snapshot named by `label` (with or without `.json`).
    pub fn read(&self, label: &str) -> BackupResult<Snapshot> {
        let path = self.snapshot_path(label)?;
        if !path.is_file() {
            return Err(BackupError::NotFound(path));
        }
        read_snapshot_file(&path)
    }

    /// Writes `snapshot` as `{root}/{label}.json`. Re-using a label clobbers
    /// the earlier file.
    pub fn write(&self, snapshot: &Snapshot, label: &str) -> BackupResult<PathBuf> {
        let path = self.snapshot_path(label)?;
        write_json(&path, snapshot)?;
        log::info!(
            "[write] Snapshot with {} pull requests written to {:?}",
            snapshot.pull_requests.len(),
            &path
        );
        Ok(path)
    }

    /// Writes a raw payload to `{root}/{run}/{relative_key}.json`.
    pub fn write_artifact<T: Serialize + ?Sized>(
        &self,
        run_instant: &DateTime<Utc>,
        relative_key: &str,
        payload: &T,
    ) -> BackupResult<PathBuf> {
        let path = self
            .run_dir(run_instant)
            .join(format!("{}.{}", relative_key, JSON_EXTENSION));
        write_json(&path, payload)?;
        log::debug!("[write_artifact] Wrote {:?}", &path);
        Ok(path)
    }

    /// Reads a stored pull request payload from a snapshot's backup
    /// location. Legacy snapshots carry no location and are looked up
    /// directly under the root, where backup runs never place artifacts;
    /// those only resolve if an operator copied the payloads there.
    pub fn read_pull_request_artifact(&self, backup_location: &str, pr_id: i64) -> BackupResult<PullRequest> {
        let location = if backup_location.is_empty() {
            log::warn!(
                "[read_pull_request_artifact] Snapshot has no backup location, looking for PR {} directly under {:?}",
                pr_id,
                &self.root
            );
            self.root.clone()
        } else {
            PathBuf::from(backup_location)
        };
        let path = location.join(format!("{}.{}", pr_id, JSON_EXTENSION));
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(BackupError::NotFound(path)),
            Err(e) => return Err(BackupError::storage("reading pull request artifact", path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| BackupError::Serialization { path, source: e })
    }

    fn snapshot_path(&self, label: &str) -> BackupResult<PathBuf> {
        let label = label.trim();
        let stem = label.strip_suffix(".json").unwrap_or(label);
        if stem.is_empty() {
            return Err(BackupError::Configuration("snapshot label is empty".to_string()));
        }
        if stem.contains('/') || stem.contains('\\') || stem.contains("..") {
            return Err(BackupError::Configuration(format!(
                "snapshot label {:?} must be a file name, not a path",
                label
            )));
        }
        Ok(self.root.join(format!("{}.{}", stem, JSON_EXTENSION)))
    }
}

fn read_snapshot_file(path: &Path) -> BackupResult<Snapshot> {
    let bytes = fs::read(path).map_err(|e| BackupError::storage("reading snapshot", path, e))?;
    Snapshot::from_json(&bytes).map_err(|e| BackupError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, payload: &T) -> BackupResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BackupError::storage("creating directories", parent, e))?;
    }
    let bytes = serde_json::to_vec_pretty(payload).map_err(|e| BackupError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, bytes).map_err(|e| BackupError::storage("writing file", path, e))
}
