use std::future::Future;
use std::time::Duration;

use crate::utils::error::{BackupError, BackupResult};

/// Runs `run` to completion, or fails with `DeadlineExceeded` once
/// `deadline` elapses. No deadline means no bound.
pub async fn run_with_deadline<T, F>(deadline: Option<Duration>, run: F) -> BackupResult<T>
where
    F: Future<Output = BackupResult<T>>,
{
    let Some(deadline) = deadline else {
        return run.await;
    };
    match tokio::time::timeout(deadline, run).await {
        Ok(res) => res,
        Err(_) => {
            log::error!("[run_with_deadline] Run exceeded deadline of {:?}", deadline);
            Err(BackupError::DeadlineExceeded(deadline))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_without_deadline_returns_result() {
        let res = run_with_deadline(None, async { Ok::<_, BackupError>(7) }).await;
        assert_eq!(res.expect("result"), 7);
    }

    #[tokio::test]
    async fn test_fast_run_beats_deadline() {
        let res = run_with_deadline(Some(Duration::from_secs(5)), async { Ok::<_, BackupError>("done") }).await;
        assert_eq!(res.expect("result"), "done");
    }

    #[tokio::test]
    async fn test_inner_error_is_kept() {
        let res: BackupResult<()> = run_with_deadline(Some(Duration::from_secs(5)), async {
            Err(BackupError::Configuration("bad".to_string()))
        })
        .await;
        assert!(matches!(res, Err(BackupError::Configuration(_))));
    }
}
