//! # Token Swap
//!
//! Quote through a [`SwapAggregator`], fetch the serialized swap transaction,
//! have the wallet sign it, then submit and confirm.

use std::str::FromStr;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use lib_core::{AppError, NotificationService, Result};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tracing::{error, info, instrument};

use crate::jupiter::{QuoteResponse, SwapAggregator};
use crate::service::{RpcConnection, WalletSigner};

/// 0.5%
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapRequest {
    pub input_mint: String,
    pub output_mint: String,
    /// Input amount in base units.
    pub amount: String,
}

struct ParsedSwap {
    input_mint: Pubkey,
    output_mint: Pubkey,
    amount: u64,
}

impl SwapRequest {
    fn parse(&self) -> Result<ParsedSwap> {
        let mint = |s: &str| {
            Pubkey::from_str(s.trim()).map_err(|_| AppError::Validation("Invalid token mint address".to_string()))
        };
        if self.amount.trim().is_empty() {
            return Err(AppError::Validation("Please enter an amount".to_string()));
        }
        let amount = self
            .amount
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|a| *a > 0)
            .ok_or_else(|| AppError::Validation("Amount must be a positive whole number of base units".to_string()))?;
        Ok(ParsedSwap {
            input_mint: mint(&self.input_mint)?,
            output_mint: mint(&self.output_mint)?,
            amount,
        })
    }
}

/// Decode a base64 bincode-serialized legacy transaction.
pub fn decode_transaction(encoded: &str) -> Result<Transaction> {
    let bytes = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Internal(format!("Invalid base64 transaction: {}", e)))?;
    bincode::deserialize(&bytes).map_err(|e| AppError::Internal(format!("Invalid transaction format: {}", e)))
}

pub struct SwapService {
    aggregator: Arc<dyn SwapAggregator>,
    rpc: Arc<dyn RpcConnection>,
    wallet: Arc<dyn WalletSigner>,
    slippage_bps: u16,
}

impl SwapService {
    pub fn new(
        aggregator: Arc<dyn SwapAggregator>,
        rpc: Arc<dyn RpcConnection>,
        wallet: Arc<dyn WalletSigner>,
    ) -> Self {
        Self {
            aggregator,
            rpc,
            wallet,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u16) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    /// Best route for `request`; a quote without a route plan is an error.
    #[instrument(skip(self), fields(input = %request.input_mint, output = %request.output_mint))]
    pub async fn quote(&self, request: &SwapRequest) -> Result<QuoteResponse> {
        let parsed = request.parse()?;
        let quote = self
            .aggregator
            .quote(
                &parsed.input_mint.to_string(),
                &parsed.output_mint.to_string(),
                parsed.amount,
                self.slippage_bps,
            )
            .await?;
        if quote.route_plan.is_empty() {
            return Err(AppError::Precondition("No routes available for this swap".to_string()));
        }
        Ok(quote)
    }

    #[instrument(skip(self, quote), fields(out_amount = %quote.out_amount))]
    pub async fn execute(&self, quote: &QuoteResponse) -> Result<Signature> {
        let owner = self.wallet.pubkey();
        let response = self.aggregator.swap_transaction(quote, &owner.to_string()).await?;
        let mut transaction = decode_transaction(&response.swap_transaction)?;

        self.wallet.sign_transaction(&mut transaction).await?;
        let signature = self.rpc.send_transaction(&transaction).await?;
        self.rpc.confirm_transaction(&signature).await?;

        info!(%signature, "Swap confirmed");
        Ok(signature)
    }

    /// Quote and execute with notifications.
    pub async fn run(
        &self,
        request: &SwapRequest,
        notifications: &NotificationService,
    ) -> Option<Signature> {
        let result = match self.quote(request).await {
            Ok(quote) => self.execute(&quote).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(signature) => {
                notifications.success("Swap completed successfully!");
                Some(signature)
            }
            Err(e) => {
                error!("Error during swap: {}", e);
                notifications.error(failure_message(&e));
                None
            }
        }
    }
}

/// Notification text for a failed quote or swap.
pub fn failure_message(err: &AppError) -> String {
    match err {
        AppError::Validation(msg) | AppError::Precondition(msg) => msg.clone(),
        _ => format!("Swap failed: {}", err.user_message()),
    }
}
