use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::error::{BackupError, BackupResult};

const DEFAULT_BASE_URL: &str = "https://dev.azure.com/";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_LEVEL: &str = "info";
pub const API_VERSION: &str = "7.1-preview.1";

/// Run configuration, built once at startup and handed to each orchestrator.
#[derive(Debug, Clone)]
pub struct AppConfig {
    base_url: String,
    organization: String,
    repository: String,
    pat_token: String,
    backup_root: PathBuf,
    restore_state_file: Option<String>,
    http_timeout: Duration,
    run_deadline: Option<Duration>,
    log_dir: PathBuf,
    log_level: String,
}

impl AppConfig {
    pub fn from_env() -> BackupResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> BackupResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            read(key).ok_or_else(|| BackupError::Configuration(format!("{} must be set", key)))
        };
        let seconds = |key: &str| -> BackupResult<Option<u64>> {
            match read(key) {
                None => Ok(None),
                Some(raw) => raw.parse::<u64>().map(Some).map_err(|e| {
                    BackupError::Configuration(format!("{} must be a number of seconds, got {:?}: {}", key, raw, e))
                }),
            }
        };

        let organization = required("AZURE_DEVOPS_ORGANIZATION")?;
        let project = required("AZURE_DEVOPS_PROJECT")?;
        let repository = required("AZURE_DEVOPS_REPOSITORY")?;
        let pat_token = required("AZURE_DEVOPS_PAT")?;
        let mut base_url = read("AZURE_DEVOPS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let backup_root = read("BACKUP_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&project).join("backup"));
        let http_timeout = Duration::from_secs(seconds("HTTP_TIMEOUT_SECS")?.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS));
        if http_timeout.is_zero() {
            return Err(BackupError::Configuration("HTTP_TIMEOUT_SECS must be greater than zero".to_string()));
        }
        let run_deadline = seconds("RUN_DEADLINE_SECS")?.map(Duration::from_secs);

        Ok(Self {
            base_url,
            organization,
            repository,
            pat_token,
            backup_root,
            restore_state_file: read("RESTORE_STATE_FILE"),
            http_timeout,
            run_deadline,
            log_dir: read("LOG_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            log_level: read("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// `{base_url}{organization}/_apis/git/repositories/{repository}`
    pub fn repository_url(&self) -> String {
        format!(
            "{}{}/_apis/git/repositories/{}",
            &self.base_url, &self.organization, &self.repository
        )
    }

    pub fn with_restore_state_file(mut self, label: Option<String>) -> Self {
        if label.is_some() {
            self.restore_state_file = label;
        }
        self
    }

    // Public getter methods
    pub fn pat_token(&self) -> &String {
        &self.pat_token
    }

    pub fn backup_root(&self) -> &PathBuf {
        &self.backup_root
    }

    pub fn restore_state_file(&self) -> Option<&str> {
        self.restore_state_file.as_deref()
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    pub fn run_deadline(&self) -> Option<Duration> {
        self.run_deadline
    }

    pub fn log_dir(&self) -> &PathBuf {
        &self.log_dir
    }

    pub fn log_level(&self) -> &String {
        &self.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("AZURE_DEVOPS_ORGANIZATION", "contoso"),
        ("AZURE_DEVOPS_PROJECT", "Fabrikam"),
        ("AZURE_DEVOPS_REPOSITORY", "web"),
        ("AZURE_DEVOPS_PAT", "secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).expect("config");
        assert_eq!(config.backup_root(), &PathBuf::from("Fabrikam").join("backup"));
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert!(config.run_deadline().is_none());
        assert!(config.restore_state_file().is_none());
        assert_eq!(
            config.repository_url(),
            "https://dev.azure.com/contoso/_apis/git/repositories/web"
        );
    }

    #[test]
    fn test_missing_pat_is_configuration_error() {
        let err = AppConfig::from_lookup(lookup(&REQUIRED[..3])).expect_err("missing PAT");
        assert!(matches!(err, BackupError::Configuration(msg) if msg.contains("AZURE_DEVOPS_PAT")));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AZURE_DEVOPS_BASE_URL", "https://tfs.local/tfs"));
        let config = AppConfig::from_lookup(lookup(&pairs)).expect("config");
        assert_eq!(config.repository_url(), "https://tfs.local/tfs/contoso/_apis/git/repositories/web");
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HTTP_TIMEOUT_SECS", "soon"));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&pairs)),
            Err(BackupError::Configuration(_))
        ));
    }

    #[test]
    fn test_cli_label_overrides_env() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RESTORE_STATE_FILE", "2024-01-01-00-00-00.json"));
        let config = AppConfig::from_lookup(lookup(&pairs))
            .expect("config")
            .with_restore_state_file(Some("2024-02-02-00-00-00".to_string()));
        assert_eq!(config.restore_state_file(), Some("2024-02-02-00-00-00"));
    }
}
