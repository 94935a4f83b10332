//! # Jupiter API Types
//!
//! Type definitions for Jupiter Aggregator quote and swap responses.

use serde::{Deserialize, Serialize};

/// Response from Jupiter quote API.
///
/// Sent back verbatim in the swap request, so unknown fields are kept in
/// `extra` instead of being dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(rename = "inputMint")]
    pub input_mint: String,
    #[serde(rename = "outputMint")]
    pub output_mint: String,
    #[serde(rename = "inAmount")]
    pub in_amount: String,
    #[serde(rename = "outAmount")]
    pub out_amount: String,
    #[serde(rename = "priceImpactPct", deserialize_with = "de_f64_or_string", default)]
    pub price_impact_pct: f64,
    #[serde(rename = "slippageBps", default)]
    pub slippage_bps: u16,
    #[serde(rename = "routePlan", default)]
    pub route_plan: Vec<RoutePlanStep>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl QuoteResponse {
    /// Labels of the AMMs along the route, in order.
    pub fn route_labels(&self) -> Vec<String> {
        self.route_plan
            .iter()
            .map(|step| step.swap_info.label.clone().unwrap_or_else(|| step.swap_info.amm_key.clone()))
            .collect()
    }
}

/// A step in Jupiter's routing plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlanStep {
    #[serde(rename = "swapInfo")]
    pub swap_info: SwapInfo,
    #[serde(default)]
    pub percent: u8,
}

/// Details about a single swap operation within a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapInfo {
    #[serde(rename = "ammKey")]
    pub amm_key: String,
    pub label: Option<String>,
    #[serde(rename = "inputMint")]
    pub input_mint: String,
    #[serde(rename = "outputMint")]
    pub output_mint: String,
    #[serde(rename = "inAmount")]
    pub in_amount: String,
    #[serde(rename = "outAmount")]
    pub out_amount: String,
    #[serde(rename = "feeAmount")]
    pub fee_amount: String,
    #[serde(rename = "feeMint")]
    pub fee_mint: String,
}

/// Response from Jupiter swap API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapTransactionResponse {
    /// Base64-encoded serialized Solana transaction
    #[serde(rename = "swapTransaction")]
    pub swap_transaction: String,
    /// Block height after which transaction is invalid
    #[serde(rename = "lastValidBlockHeight", default)]
    pub last_valid_block_height: u64,
    #[serde(rename = "prioritizationFeeLamports")]
    pub prioritization_fee_lamports: Option<u64>,
}

/// Jupiter reports `priceImpactPct` as a string in v6 and a number in older responses.
fn de_f64_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTE_JSON: &str = r#"{
        "inputMint": "So11111111111111111111111111111111111111112",
        "inAmount": "1000000",
        "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        "outAmount": "171234",
        "otherAmountThreshold": "170378",
        "swapMode": "ExactIn",
        "slippageBps": 50,
        "priceImpactPct": "0.0012",
        "routePlan": [
            {
                "swapInfo": {
                    "ammKey": "HcoJqG325TTifs6jyWvRJ9ET4pDu12Xrt2EQKZGFmuKX",
                    "label": "Whirlpool",
                    "inputMint": "So11111111111111111111111111111111111111112",
                    "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                    "inAmount": "1000000",
                    "outAmount": "171234",
                    "feeAmount": "300",
                    "feeMint": "So11111111111111111111111111111111111111112"
                },
                "percent": 100
            }
        ]
    }"#;

    #[test]
    fn test_parse_v6_quote() {
        let quote: QuoteResponse = serde_json::from_str(QUOTE_JSON).unwrap();
        assert_eq!(quote.out_amount, "171234");
        assert_eq!(quote.slippage_bps, 50);
        assert!((quote.price_impact_pct - 0.0012).abs() < f64::EPSILON);
        assert_eq!(quote.route_labels(), vec!["Whirlpool".to_string()]);
    }

    #[test]
    fn test_quote_keeps_unknown_fields_for_swap_request() {
        let quote: QuoteResponse = serde_json::from_str(QUOTE_JSON).unwrap();
        let echoed = serde_json::to_value(&quote).unwrap();
        assert_eq!(echoed["otherAmountThreshold"], "170378");
        assert_eq!(echoed["swapMode"], "ExactIn");
    }

    #[test]
    fn test_numeric_price_impact() {
        let json = QUOTE_JSON.replace(r#""0.0012""#, "0.5");
        let quote: QuoteResponse = serde_json::from_str(&json).unwrap();
        assert!((quote.price_impact_pct - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_swap_response() {
        let response: SwapTransactionResponse =
            serde_json::from_str(r#"{"swapTransaction":"AQID","lastValidBlockHeight":279632475}"#).unwrap();
        assert_eq!(response.swap_transaction, "AQID");
        assert_eq!(response.prioritization_fee_lamports, None);
    }
}
