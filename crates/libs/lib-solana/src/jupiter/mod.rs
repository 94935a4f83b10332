//! # Jupiter Aggregator Client
//!
//! Quote and swap-transaction calls against the Jupiter v6 API.

// region: --- Modules
pub mod client;
pub mod quote;
pub mod swap;
pub mod types;
// endregion: --- Modules

// region: --- Main Client
use std::time::Duration;

use async_trait::async_trait;
use client::JupiterHttpClient;
use lib_core::config::DEFAULT_JUPITER_API_URL;
use lib_core::{AppError, Config, Result};

pub use types::*;

/// Swap routing backend used by [`crate::swap::SwapService`].
#[async_trait]
pub trait SwapAggregator: Send + Sync {
    async fn quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> Result<QuoteResponse>;

    async fn swap_transaction(
        &self,
        quote: &QuoteResponse,
        user_public_key: &str,
    ) -> Result<SwapTransactionResponse>;
}

/// Builder for configuring JupiterClient.
#[derive(Debug, Clone)]
pub struct JupiterClientBuilder {
    timeout: Option<Duration>,
    quote_api_base: Option<String>,
}

impl Default for JupiterClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(10)),
            quote_api_base: Some(DEFAULT_JUPITER_API_URL.to_string()),
        }
    }
}

impl JupiterClientBuilder {
    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the quote API base URL (quote and swap endpoints hang off it).
    pub fn quote_api_base(mut self, url: String) -> Self {
        self.quote_api_base = Some(url);
        self
    }

    /// Build the JupiterClient with configured settings.
    pub fn build(self) -> Result<JupiterClient> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or_else(|| Duration::from_secs(10)))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let quote_api_base = self
            .quote_api_base
            .unwrap_or_else(|| DEFAULT_JUPITER_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(JupiterClient {
            inner: JupiterHttpClient { http, quote_api_base },
        })
    }
}

/// Client for Jupiter Aggregator API
pub struct JupiterClient {
    inner: JupiterHttpClient,
}

impl JupiterClient {
    /// Create a new Jupiter client using a builder for configuration.
    ///
    /// ```rust,no_run
    /// use lib_solana::jupiter::JupiterClient;
    ///
    /// let client = JupiterClient::builder()
    ///     .timeout(std::time::Duration::from_secs(30))
    ///     .quote_api_base("https://quote-api.jup.ag/v6".to_string())
    ///     .build()?;
    /// # Ok::<(), lib_core::AppError>(())
    /// ```
    pub fn builder() -> JupiterClientBuilder {
        JupiterClientBuilder::default()
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder().quote_api_base(config.jupiter_api_url.clone()).build()
    }

    pub fn quote_api_base(&self) -> &str {
        &self.inner.quote_api_base
    }
}

#[async_trait]
impl SwapAggregator for JupiterClient {
    async fn quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> Result<QuoteResponse> {
        self.inner.get_swap_quote(input_mint, output_mint, amount, slippage_bps).await
    }

    async fn swap_transaction(
        &self,
        quote: &QuoteResponse,
        user_public_key: &str,
    ) -> Result<SwapTransactionResponse> {
        self.inner.get_swap_transaction(quote, user_public_key).await
    }
}
// endregion: --- Main Client
