use crate::utils::fingerprint::PullRequestFingerprint;

/// Reports whether `current` differs from `previous` in any tracked PR.
///
/// A length mismatch is a change. Otherwise every previous entry must have a
/// current entry with the same id and identical timestamps. The scan only
/// runs previous -> current; with unique ids on both sides and equal
/// lengths, finding every previous id in `current` means the id sets match.
pub fn has_changed(previous: &[PullRequestFingerprint], current: &[PullRequestFingerprint]) -> bool {
    if previous.len() != current.len() {
        log::debug!(
            "[has_changed] PR count changed from {} to {}",
            previous.len(),
            current.len()
        );
        return true;
    }
    for prev in previous {
        let current_opt = current.iter().find(|fp| fp.id == prev.id);
        let Some(curr) = current_opt else {
            log::debug!("[has_changed] PR {} no longer active", prev.id);
            return true;
        };
        if prev.thread_last_updated != curr.thread_last_updated
            || prev.last_merge_commit != curr.last_merge_commit
        {
            log::debug!("[has_changed] PR {} changed: {:?} -> {:?}", prev.id, prev, curr);
            return true;
        }
    }
    false
}
