use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

pub const LOG_RETENTION: Duration = Duration::from_secs(60 * 24 * 60 * 60);

/// Removes `.log` files in `logs_dir` last modified more than `retention`
/// ago. Returns how many were removed; problems are logged and skipped.
pub fn cleanup_old_logs(logs_dir: &Path, retention: Duration) -> usize {
    let entries = match fs::read_dir(logs_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("[cleanup_old_logs] Unable to read logs dir {:?}: {:?}", logs_dir, e);
            return 0;
        }
    };
    let current_time = SystemTime::now();
    let mut removed = 0;
    for entry_res in entries {
        let entry = match entry_res {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("[cleanup_old_logs] Error in getting dir entry: {:?}", e);
                continue;
            }
        };
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("log") {
            continue;
        }
        let modified_time = match entry.metadata().and_then(|metadata| metadata.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                log::error!("[cleanup_old_logs] Unable to get last modified time of {:?}: {:?}", &path, e);
                continue;
            }
        };
        // Files stamped in the future are left alone.
        let Ok(elapsed) = current_time.duration_since(modified_time) else {
            continue;
        };
        if elapsed > retention {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => log::error!("[cleanup_old_logs] Unable to remove old log file {:?}: {:?}", &path, e),
            }
        }
    }
    removed
}
