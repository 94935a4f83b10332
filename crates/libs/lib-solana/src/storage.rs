//! # Content Storage
//!
//! HTTP upload client for off-chain NFT metadata and images.
//!
//! The upload endpoint receives the raw bytes as the request body; every tag
//! is forwarded as a request header (so `Content-Type` behaves as usual) and
//! the endpoint answers with `{ "id": "<content id>" }`. Public URIs are
//! `{gateway}/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use lib_core::{AppError, Config, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::service::ContentStore;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

pub struct HttpContentStore {
    http: reqwest::Client,
    upload_url: String,
    gateway_url: String,
}

impl HttpContentStore {
    pub fn new(upload_url: impl Into<String>, gateway_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Storage(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            upload_url: upload_url.into(),
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Store configured by `STORAGE_UPLOAD_URL`, or `None` when uploads are disabled.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        config
            .storage_upload_url
            .as_ref()
            .map(|url| Self::new(url.clone(), config.storage_gateway_url.clone()))
            .transpose()
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    #[instrument(skip(self, data, tags), fields(bytes = data.len()))]
    async fn upload(&self, data: Vec<u8>, tags: &[(&str, &str)]) -> Result<String> {
        let mut request = self.http.post(&self.upload_url).body(data);
        for (name, value) in tags {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited(format!("Upload rejected with {}", status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!("Upload failed with {}: {}", status, body)));
        }

        let UploadResponse { id } = response
            .json()
            .await
            .map_err(|e| AppError::Storage(format!("Invalid upload response: {}", e)))?;
        debug!(%id, "Content uploaded");
        Ok(id)
    }

    fn uri_for(&self, id: &str) -> String {
        format!("{}/{}", self.gateway_url, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_for_joins_gateway_and_id() {
        let store = HttpContentStore::new("https://upload.example.com", "https://arweave.net/").unwrap();
        assert_eq!(store.uri_for("abc123"), "https://arweave.net/abc123");
    }

    #[test]
    fn test_from_config_without_upload_url_is_disabled() {
        let config = Config::default();
        assert!(HttpContentStore::from_config(&config).unwrap().is_none());
    }

    #[tokio::test]
    #[ignore] // Requires a running upload endpoint
    async fn test_upload_round_trip() {
        let store = HttpContentStore::new("http://localhost:8080/upload", "http://localhost:8080").unwrap();
        let id = store
            .upload(b"{}".to_vec(), &[("Content-Type", "application/json")])
            .await
            .unwrap();
        assert!(!id.is_empty());
    }
}
