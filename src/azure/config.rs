use std::time::Duration;

use base64ct::{Base64, Encoding};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;

use crate::utils::error::{BackupError, BackupResult};

const CLIENT_USER_AGENT: &str = concat!("azure-pr-backup/", env!("CARGO_PKG_VERSION"));

/// Azure DevOps takes a PAT as the password of a Basic credential with an
/// empty user name.
pub fn basic_auth_value(pat_token: &str) -> String {
    let credential = format!(":{}", pat_token);
    format!("Basic {}", Base64::encode_string(credential.as_bytes()))
}

pub fn prepare_headers(pat_token: &str) -> BackupResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut auth_header = HeaderValue::from_str(&basic_auth_value(pat_token))
        .map_err(|e| BackupError::Configuration(format!("PAT is not a valid header value: {}", e)))?;
    auth_header.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_header);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    Ok(headers)
}

/// One client per process, every request bounded by `timeout`.
pub fn build_http_client(pat_token: &str, timeout: Duration) -> BackupResult<Client> {
    let headers = prepare_headers(pat_token)?;
    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| BackupError::Configuration(format!("Unable to build http client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_value_encodes_empty_user() {
        // base64(":pat")
        assert_eq!(basic_auth_value("pat"), "Basic OnBhdA==");
    }

    #[test]
    fn test_prepare_headers() {
        let headers = prepare_headers("pat").expect("headers");
        assert_eq!(headers.get(AUTHORIZATION).expect("auth header"), "Basic OnBhdA==");
        assert!(headers.get(AUTHORIZATION).expect("auth header").is_sensitive());
        assert_eq!(headers.get(ACCEPT).expect("accept header"), "application/json");
    }
}
