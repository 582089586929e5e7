//! Scan Service Client
//!
//! `POST {endpoint}` with `{"url": "..."}`. The service launches a headless
//! browser, screenshots the page and returns a [`ScanResult`]. On failure it
//! may send `{"detail": "..."}`.
//!
//! No retries: a failed scan is reported to the user as-is.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::models::config::SherlockConfig;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::ScanResult;
use crate::utils::constants::USER_AGENT;

#[derive(Debug, Serialize)]
struct ScanRequest<'a> {
    url: &'a str,
}

/// Error body of a non-success response
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// HTTP client for the scan endpoint
#[derive(Clone)]
pub struct ScanClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ScanClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                warn!("⚠️ ScanClient: custom client failed ({}), using defaults", e);
                reqwest::Client::new()
            });

        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(config: &SherlockConfig) -> Self {
        Self::new(config.scan_endpoint.clone(), config.scan_timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request a scan of `url`
    pub async fn scan(&self, url: &str) -> AppResult<ScanResult> {
        info!("🔍 Scan requested: {}", url);

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&ScanRequest { url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = rejection(status, &body);
            warn!("❌ Scan rejected: {}", err);
            return Err(err);
        }

        let body = response.text().await?;
        let result: ScanResult = serde_json::from_str(&body).map_err(|e| {
            AppError::with_source(
                ErrorCode::ScanInvalidResponse,
                "Scan service returned an unexpected payload",
                e,
            )
        })?;

        info!("✅ Scan complete: {}", result.summary());
        Ok(result)
    }
}

/// Build the error for a non-success status, preferring the service's `detail`
fn rejection(status: StatusCode, body: &str) -> AppError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty());

    let message = detail.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    });

    AppError::scan_rejected(message)
}
