//! # Jupiter Swap Transaction Building
//!
//! Swap transaction building from Jupiter quotes.

use lib_core::Result;
use tracing::debug;

use super::client::JupiterHttpClient;
use super::types::{QuoteResponse, SwapTransactionResponse};

impl JupiterHttpClient {
    /// Body of the swap request. Legacy transactions keep signing on the plain
    /// `Transaction` path.
    pub fn swap_request_body(
        quote_response: &QuoteResponse,
        user_public_key: &str,
    ) -> serde_json::Value {
        serde_json::json!({
            "quoteResponse": quote_response,
            "userPublicKey": user_public_key,
            "wrapAndUnwrapSol": true,
            "asLegacyTransaction": true,
        })
    }

    /// Build an unsigned swap transaction from a quote
    pub async fn get_swap_transaction(
        &self,
        quote_response: &QuoteResponse,
        user_public_key: &str,
    ) -> Result<SwapTransactionResponse> {
        let url = format!("{}/swap", self.quote_api_base);
        let request_body = Self::swap_request_body(quote_response, user_public_key);

        debug!("Jupiter swap transaction request for user: {}", user_public_key);

        let swap_response: SwapTransactionResponse =
            Self::read_json(self.http.post(&url).json(&request_body).send().await, "swap").await?;

        debug!("Jupiter swap transaction received");
        Ok(swap_response)
    }
}
