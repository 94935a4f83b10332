//! # Jupiter HTTP Client
//!
//! HTTP client wrapper and response handling shared by the quote and swap calls.

use lib_core::error::is_rate_limit_message;
use lib_core::{AppError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client wrapper for Jupiter API
pub struct JupiterHttpClient {
    pub http: Client,
    pub quote_api_base: String,
}

impl JupiterHttpClient {
    /// Map transport errors, rate limits and non-success statuses, then parse the body.
    pub(crate) async fn read_json<T: DeserializeOwned>(
        response: reqwest::Result<Response>,
        what: &str,
    ) -> Result<T> {
        let response = response.map_err(|e| {
            let raw = format!("Jupiter {} request failed: {}", what, e);
            if is_rate_limit_message(&raw) {
                AppError::RateLimited(raw)
            } else {
                AppError::Rpc(raw)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited(format!("Jupiter {} returned {}", what, status)));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Rpc(format!("Jupiter {} failed ({}): {}", what, status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Rpc(format!("Jupiter {} parse failed: {}", what, e)))
    }
}
