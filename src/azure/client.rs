use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::azure::config::build_http_client;
use crate::utils::config::{AppConfig, API_VERSION};
use crate::utils::error::{BackupError, BackupResult};

/// Authenticated handle on one Azure DevOps git repository.
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient {
    http: Client,
    repository_url: String,
}

impl AzureDevOpsClient {
    pub fn new(config: &AppConfig) -> BackupResult<Self> {
        let http = build_http_client(config.pat_token(), config.http_timeout())?;
        Ok(Self::with_http_client(http, config.repository_url()))
    }

    pub fn with_http_client(http: Client, repository_url: String) -> Self {
        Self { http, repository_url }
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    pub(crate) fn pull_requests_url(&self) -> String {
        format!("{}/pullrequests", &self.repository_url)
    }

    pub(crate) fn pull_request_url(&self, pr_id: i64) -> String {
        format!("{}/pullrequests/{}", &self.repository_url, pr_id)
    }

    /// GET returning `Ok(None)` on 404; any other non-success status is a
    /// `RemoteFetch` error.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> BackupResult<Option<T>> {
        log::debug!("[get_json] GET {}", url);
        let response = self
            .http
            .get(url)
            .query(&[("api-version", API_VERSION)])
            .query(params)
            .send()
            .await
            .map_err(|e| BackupError::remote_fetch(url, describe_send_error(&e)))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            log::info!("[get_json] {} answered 404", url);
            return Ok(None);
        }
        if !status.is_success() {
            let body = response_snippet(response).await;
            log::error!("[get_json] Failed to call Azure DevOps API {}, status: {}, body: {}", url, status, &body);
            return Err(BackupError::remote_fetch(url, format!("status {}: {}", status, body)));
        }
        let parsed = response
            .json::<T>()
            .await
            .map_err(|e| BackupError::remote_fetch(url, format!("unreadable response body: {}", e)))?;
        Ok(Some(parsed))
    }

    /// POST/PATCH with a JSON body; failures are `RemoteWrite` errors.
    pub(crate) async fn send_json<B, T>(&self, method: Method, url: &str, body: &B) -> BackupResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("[send_json] {} {}", &method, url);
        let response = self
            .http
            .request(method.clone(), url)
            .query(&[("api-version", API_VERSION)])
            .json(body)
            .send()
            .await
            .map_err(|e| BackupError::remote_write(url, describe_send_error(&e)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response_snippet(response).await;
            log::error!("[send_json] {} {} failed, status: {}, body: {}", &method, url, status, &body);
            return Err(BackupError::remote_write(url, format!("status {}: {}", status, body)));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| BackupError::remote_write(url, format!("unreadable response body: {}", e)))
    }
}

fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else {
        format!("request failed: {}", e)
    }
}

async fn response_snippet(response: Response) -> String {
    const MAX_LEN: usize = 512;
    match response.text().await {
        Ok(text) if text.len() > MAX_LEN => {
            let mut end = MAX_LEN;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &text[..end])
        }
        Ok(text) => text,
        Err(e) => format!("<unreadable body: {}>", e),
    }
}
