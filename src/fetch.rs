//! Status API client.
//!
//! One POST with an empty JSON body against the configured endpoint,
//! parsed as loosely-typed JSON. Shape validation of the payload happens
//! in the caller, not here. There is no retry — a single failure ends the
//! run.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Fixed timeout for the single status request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent with every status request.
const USER_AGENT: &str = concat!("nodewatch/", env!("CARGO_PKG_VERSION"));

/// Maximum characters of an upstream error body kept in diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Errors from the single status API call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, DNS, timeout).
    #[error("status API request failed: {0}")]
    Request(#[source] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("status API returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, collapsed and truncated for the log.
        body: String,
    },
    /// The response body was not valid JSON.
    #[error("status API returned invalid JSON: {0}")]
    Json(#[source] reqwest::Error),
}

/// HTTP client for the status API.
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: reqwest::Client,
}

impl StatusClient {
    /// Build a client with the fixed request timeout and User-Agent.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Request`] if the underlying client cannot be
    /// constructed (TLS backend initialisation).
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Request)?;
        Ok(Self { client })
    }

    /// Fetch the node list: one blocking POST, empty JSON object body.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] variant distinguishing transport failure,
    /// non-success HTTP status, and undecodable JSON.
    pub async fn fetch_nodes(&self, api_url: &str) -> Result<Value, FetchError> {
        info!(url = %api_url, "fetching node data from status API");

        let response = self
            .client
            .post(api_url)
            .header("accept", "application/json, text/plain, */*")
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: condense_error_body(&body),
            });
        }

        response.json::<Value>().await.map_err(FetchError::Json)
    }
}

/// Collapse whitespace and truncate an upstream error body for diagnostics.
fn condense_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = collapsed
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }
    collapsed
}

// ── Tests ───────────────────────────────────────────────────────
