//! # Jupiter Quote API
//!
//! Quote API integration for getting swap quotes from Jupiter.

use lib_core::Result;
use tracing::debug;

use super::client::JupiterHttpClient;
use super::types::QuoteResponse;

impl JupiterHttpClient {
    pub fn quote_url(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> String {
        format!(
            "{}/quote?inputMint={}&outputMint={}&amount={}&slippageBps={}",
            self.quote_api_base, input_mint, output_mint, amount, slippage_bps
        )
    }

    /// Get a swap quote from Jupiter Aggregator V6
    pub async fn get_swap_quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u16,
    ) -> Result<QuoteResponse> {
        let url = self.quote_url(input_mint, output_mint, amount, slippage_bps);
        debug!("Jupiter swap quote request: {}", url);

        let quote: QuoteResponse = Self::read_json(self.http.get(&url).send().await, "quote").await?;

        debug!(
            "Jupiter quote: {} -> {} (impact: {:.2}%)",
            quote.in_amount, quote.out_amount, quote.price_impact_pct
        );
        Ok(quote)
    }
}
