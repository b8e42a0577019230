//! Dropbox HTTP client
//!
//! Wraps `reqwest::Client` with bearer authentication and the two base
//! URLs Dropbox splits its API across. RPC calls carry JSON bodies;
//! content calls carry octet-stream bodies with their JSON arguments in
//! the `Dropbox-API-Arg` header.

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

/// Base URL for RPC endpoints (metadata operations)
const API_BASE_URL: &str = "https://api.dropboxapi.com";

/// Base URL for content endpoints (uploads, downloads)
const CONTENT_BASE_URL: &str = "https://content.dropboxapi.com";

/// HTTP client for Dropbox API v2 calls
pub struct DropboxClient {
    http: Client,
    api_base: String,
    content_base: String,
    access_token: String,
}

impl DropboxClient {
    /// Creates a client with the given access token against production
    /// Dropbox endpoints
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_urls(access_token, API_BASE_URL, CONTENT_BASE_URL)
    }

    /// Creates a client with custom base URLs (useful for testing)
    pub fn with_base_urls(
        access_token: impl Into<String>,
        api_base: impl Into<String>,
        content_base: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into(),
            content_base: content_base.into(),
            access_token: access_token.into(),
        }
    }

    /// Issues an RPC call: JSON in, JSON out
    pub(crate) async fn rpc(&self, endpoint: &str, args: &serde_json::Value) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        debug!(endpoint, "RPC call");
        self.http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(args)
            .send()
            .await
            .with_context(|| format!("Request to {endpoint} failed"))
    }

    /// Issues a content call: args in the `Dropbox-API-Arg` header,
    /// raw bytes in the body
    pub(crate) async fn content(
        &self,
        endpoint: &str,
        arg: &serde_json::Value,
        body: Vec<u8>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.content_base, endpoint);
        debug!(endpoint, body_len = body.len(), "Content call");
        self.http
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", arg.to_string())
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await
            .with_context(|| format!("Request to {endpoint} failed"))
    }

    /// Extracts Dropbox's error summary from a failed response
    ///
    /// Dropbox reports routing errors as HTTP 409 with a JSON body
    /// carrying `error_summary` (e.g. `path/not_found/..`).
    pub(crate) async fn error_summary(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let summary = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error_summary")
                    .and_then(|s| s.as_str())
                    .map(String::from)
            })
            .unwrap_or(body);
        format!("HTTP {status}: {summary}")
    }

    /// True when the failed response names the given Dropbox error path
    pub(crate) fn is_conflict(status: StatusCode) -> bool {
        status == StatusCode::CONFLICT
    }
}
