//! # Action Orchestrator
//!
//! Runs one token action (burn, transfer, delegate, revoke, close) as a linear
//! state machine:
//!
//! ```text
//! Validating -> BuildingInstructions -> Signing -> Submitting -> Confirming -> Succeeded
//!      \______________\__________________\__________\______________\________> Failed
//! ```
//!
//! Validation never touches the network. The wallet is asked to sign at most
//! once and a rejection is final.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lib_core::{AppError, NotificationService, Result};
use lib_utils::validate_not_empty;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tracing::{debug, error, info, instrument};

use crate::service::{RpcConnection, WalletSigner};
use crate::spl_token::{self, associated_token_address, scale_amount};
use crate::types::TokenHolding;

// region: --- Types

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Burn,
    Transfer,
    Delegate,
    Revoke,
    Close,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Burn,
        ActionKind::Transfer,
        ActionKind::Delegate,
        ActionKind::Revoke,
        ActionKind::Close,
    ];

    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Burn => "burn",
            ActionKind::Transfer => "transfer",
            ActionKind::Delegate => "delegate",
            ActionKind::Revoke => "revoke",
            ActionKind::Close => "close",
        }
    }

    pub fn needs_amount(&self) -> bool {
        matches!(self, ActionKind::Burn | ActionKind::Transfer | ActionKind::Delegate)
    }

    pub fn needs_recipient(&self) -> bool {
        matches!(self, ActionKind::Transfer | ActionKind::Delegate)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Action selected in the UI, with the raw form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub token: TokenHolding,
    pub kind: ActionKind,
    pub amount: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStage {
    Validating,
    BuildingInstructions,
    Signing,
    Submitting,
    Confirming,
    Succeeded,
    Failed,
}

impl ActionStage {
    /// Status line shown while the stage is active.
    pub fn status(&self, kind: ActionKind) -> Option<String> {
        match self {
            ActionStage::Validating => None,
            ActionStage::BuildingInstructions => Some(format!("Preparing to {} token...", kind)),
            ActionStage::Signing => Some("Signing transaction...".to_string()),
            ActionStage::Submitting => Some("Sending transaction...".to_string()),
            ActionStage::Confirming => Some("Confirming transaction...".to_string()),
            ActionStage::Succeeded | ActionStage::Failed => None,
        }
    }
}

/// Receives every stage transition with the current status line.
pub type ProgressObserver = Arc<dyn Fn(ActionStage, &str) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub signature: Signature,
    pub message: String,
}

/// Parsed form input.
#[derive(Debug, Clone, Copy)]
struct ValidatedInput {
    amount: u64,
    recipient: Option<Pubkey>,
}

// endregion: --- Types

pub struct ActionOrchestrator {
    rpc: Arc<dyn RpcConnection>,
    wallet: Arc<dyn WalletSigner>,
    observer: Option<ProgressObserver>,
}

impl ActionOrchestrator {
    pub fn new(rpc: Arc<dyn RpcConnection>, wallet: Arc<dyn WalletSigner>) -> Self {
        Self {
            rpc,
            wallet,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    fn enter(&self, stage: ActionStage, kind: ActionKind, status: Option<String>) {
        let status = status.or_else(|| stage.status(kind)).unwrap_or_default();
        debug!(action = %kind, ?stage, "{}", status);
        if let Some(observer) = &self.observer {
            observer(stage, &status);
        }
    }

    /// Required-field and format checks. No network access.
    fn validate(action: &PendingAction) -> Result<ValidatedInput> {
        let kind = action.kind;

        let amount = if kind.needs_amount() {
            validate_not_empty(&action.amount, "Amount")
                .map_err(|_| AppError::Validation("Please enter an amount".to_string()))?;
            scale_amount(&action.amount, action.token.decimals)?
        } else {
            0
        };

        let recipient = if kind.needs_recipient() {
            validate_not_empty(&action.recipient, "Recipient")
                .map_err(|_| AppError::Validation("Please enter a recipient address".to_string()))?;
            let recipient = Pubkey::from_str(action.recipient.trim())
                .map_err(|_| AppError::Validation("Invalid recipient address".to_string()))?;
            Some(recipient)
        } else {
            None
        };

        Ok(ValidatedInput { amount, recipient })
    }

    /// Instruction list for `action`, without signing or sending.
    pub async fn plan(&self, action: &PendingAction) -> Result<Vec<Instruction>> {
        let input = Self::validate(action)?;
        self.build_instructions(action, input).await
    }

    async fn build_instructions(
        &self,
        action: &PendingAction,
        input: ValidatedInput,
    ) -> Result<Vec<Instruction>> {
        let token = &action.token;
        let program = token.program;
        let owner = self.wallet.pubkey();
        let owner_ata = associated_token_address(&owner, &token.mint, program);
        let recipient = || {
            input
                .recipient
                .ok_or_else(|| AppError::Internal("recipient missing after validation".to_string()))
        };

        let mut instructions = Vec::with_capacity(2);
        match action.kind {
            ActionKind::Burn => {
                instructions.push(spl_token::burn(
                    program,
                    &owner_ata,
                    &token.mint,
                    &owner,
                    input.amount,
                    token.decimals,
                )?);
            }
            ActionKind::Transfer => {
                let recipient = recipient()?;
                let recipient_ata = associated_token_address(&recipient, &token.mint, program);
                if !self.rpc.account_exists(&recipient_ata).await? {
                    debug!(%recipient_ata, "Recipient token account missing, creating it");
                    instructions.push(spl_token::create_associated_account(
                        program,
                        &owner,
                        &recipient,
                        &token.mint,
                    ));
                }
                instructions.push(spl_token::transfer(
                    program,
                    &owner_ata,
                    &token.mint,
                    &recipient_ata,
                    &owner,
                    input.amount,
                    token.decimals,
                )?);
            }
            ActionKind::Delegate => {
                instructions.push(spl_token::approve(
                    program,
                    &owner_ata,
                    &token.mint,
                    &recipient()?,
                    &owner,
                    input.amount,
                    token.decimals,
                )?);
            }
            ActionKind::Revoke => {
                if self.rpc.token_delegate(&owner_ata).await?.is_none() {
                    return Err(AppError::Precondition("No delegate found for this token.".to_string()));
                }
                instructions.push(spl_token::revoke(program, &owner_ata, &owner)?);
            }
            ActionKind::Close => {
                if self.rpc.token_balance(&owner_ata).await? > 0 {
                    return Err(AppError::Precondition(
                        "Cannot close account with non-zero balance. Please transfer or burn remaining tokens first."
                            .to_string(),
                    ));
                }
                instructions.push(spl_token::close_account(program, &owner_ata, &owner)?);
            }
        }
        Ok(instructions)
    }

    /// Run `action` through every stage.
    #[instrument(skip(self, action), fields(action = %action.kind, mint = %action.token.mint))]
    pub async fn execute(&self, action: &PendingAction) -> Result<ActionOutcome> {
        let kind = action.kind;

        self.enter(ActionStage::Validating, kind, None);
        let input = Self::validate(action)?;

        self.enter(ActionStage::BuildingInstructions, kind, None);
        let instructions = self.build_instructions(action, input).await?;

        self.enter(ActionStage::Signing, kind, None);
        let owner = self.wallet.pubkey();
        let blockhash = self.rpc.latest_blockhash().await?;
        let mut message = Message::new(&instructions, Some(&owner));
        message.recent_blockhash = blockhash;
        let mut transaction = Transaction::new_unsigned(message);
        self.wallet.sign_transaction(&mut transaction).await?;

        self.enter(ActionStage::Submitting, kind, None);
        let signature = self.rpc.send_transaction(&transaction).await?;

        self.enter(ActionStage::Confirming, kind, None);
        self.rpc.confirm_transaction(&signature).await?;

        let message = success_message(action);
        self.enter(ActionStage::Succeeded, kind, Some(message.clone()));
        info!(%signature, "{}", message);
        Ok(ActionOutcome { signature, message })
    }

    /// [`execute`](Self::execute) plus user-facing reporting: one success or
    /// error notification, and the final status line to the observer.
    pub async fn run(
        &self,
        action: &PendingAction,
        notifications: &NotificationService,
    ) -> Option<ActionOutcome> {
        match self.execute(action).await {
            Ok(outcome) => {
                notifications.success(outcome.message.clone());
                Some(outcome)
            }
            Err(e) => {
                let message = failure_message(action.kind, &e);
                match &e {
                    AppError::Validation(_) | AppError::Precondition(_) => debug!("Action not performed: {}", e),
                    _ => error!("Error performing {} action: {}", action.kind, e),
                }
                self.enter(ActionStage::Failed, action.kind, Some(message.clone()));
                notifications.error(message);
                None
            }
        }
    }
}

/// Notification text for a completed action.
pub fn success_message(action: &PendingAction) -> String {
    let amount = action.amount.trim();
    let recipient = action.recipient.trim();
    match action.kind {
        ActionKind::Burn => format!("Burned {} tokens successfully.", amount),
        ActionKind::Transfer => format!("Transferred {} tokens to {} successfully.", amount, recipient),
        ActionKind::Delegate => format!("Delegated {} tokens to {} successfully.", amount, recipient),
        ActionKind::Revoke => "Revoked delegation for the token successfully.".to_string(),
        ActionKind::Close => "Closed the token account successfully.".to_string(),
    }
}

/// Notification text for a failed action.
pub fn failure_message(kind: ActionKind, err: &AppError) -> String {
    if let AppError::Validation(msg) = err {
        return msg.clone();
    }
    match err.hint() {
        Some(hint) => hint.to_string(),
        None => format!("Failed to {} token. {}", kind, err.user_message()),
    }
}
