//! # Token Type Definitions
//!
//! Data structures shared by discovery, the action orchestrator and the
//! creation flows.
//!
//! ## Overview
//!
//! - [`ProgramVariant`]: which token program owns a mint (SPL Token or Token-2022)
//! - [`RawTokenAccount`]: a token account as reported by the RPC, validated at the boundary
//! - [`TokenHolding`]: a discovered holding with optional display metadata
//! - [`CreatedAsset`], [`CollectionRecord`], [`CollectionMembership`]: results of the creation flows

use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::spl_token::format_amount;

pub const TOKEN_2022_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

// region: --- ProgramVariant

/// Token program variant owning a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProgramVariant {
    Token,
    Token2022,
}

impl ProgramVariant {
    /// Discovery order: SPL Token first, then Token-2022.
    pub const ALL: [ProgramVariant; 2] = [ProgramVariant::Token, ProgramVariant::Token2022];

    pub fn program_id(&self) -> Pubkey {
        match self {
            ProgramVariant::Token => spl_token::id(),
            ProgramVariant::Token2022 => TOKEN_2022_PROGRAM_ID,
        }
    }

    pub fn from_program_id(program_id: &Pubkey) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.program_id() == *program_id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProgramVariant::Token => "SPL Token",
            ProgramVariant::Token2022 => "Token-2022",
        }
    }
}

impl fmt::Display for ProgramVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// endregion: --- ProgramVariant

// region: --- Accounts

/// Token account fields read from the RPC's `jsonParsed` encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTokenAccount {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub decimals: u8,
    pub delegate: Option<Pubkey>,
}

impl RawTokenAccount {
    /// Read a `jsonParsed` account data object:
    ///
    /// ```json
    /// { "parsed": { "info": { "mint": "...", "owner": "...",
    ///   "tokenAmount": { "amount": "100", "decimals": 9 }, "delegate": "..." } } }
    /// ```
    ///
    /// Returns `None` when any required field is missing or malformed.
    pub fn from_parsed(address: &str, data: &Value) -> Option<Self> {
        let info = data.get("parsed")?.get("info")?;
        let token_amount = info.get("tokenAmount")?;

        let pubkey_field = |field: &str| -> Option<Pubkey> {
            info.get(field)?.as_str().and_then(|s| Pubkey::from_str(s).ok())
        };

        Some(Self {
            address: Pubkey::from_str(address).ok()?,
            mint: pubkey_field("mint")?,
            owner: pubkey_field("owner")?,
            amount: token_amount.get("amount")?.as_str()?.parse().ok()?,
            decimals: u8::try_from(token_amount.get("decimals")?.as_u64()?).ok()?,
            delegate: pubkey_field("delegate"),
        })
    }
}

/// On-chain metadata attached to a mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMetadata {
    pub mint: Pubkey,
    pub update_authority: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
    pub collection: Option<CollectionRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, BorshSerialize, BorshDeserialize)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    pub share: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, BorshSerialize, BorshDeserialize)]
pub struct CollectionRef {
    pub verified: bool,
    pub key: Pubkey,
}

/// A token account owned by the connected wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenHolding {
    pub account: Pubkey,
    pub mint: Pubkey,
    pub program: ProgramVariant,
    pub raw_amount: u64,
    pub decimals: u8,
    pub delegate: Option<Pubkey>,
    pub metadata: Option<TokenMetadata>,
}

impl TokenHolding {
    pub fn from_raw(raw: RawTokenAccount, program: ProgramVariant) -> Self {
        Self {
            account: raw.address,
            mint: raw.mint,
            program,
            raw_amount: raw.amount,
            decimals: raw.decimals,
            delegate: raw.delegate,
            metadata: None,
        }
    }

    /// Balance formatted with the mint's decimals.
    pub fn ui_amount(&self) -> String {
        format_amount(self.raw_amount, self.decimals)
    }

    /// Metadata name if present, otherwise the mint address.
    pub fn display_name(&self) -> String {
        match &self.metadata {
            Some(meta) if !meta.name.is_empty() => format!("{} ({})", meta.name, meta.symbol),
            _ => self.mint.to_string(),
        }
    }
}

// endregion: --- Accounts

// region: --- Creation results

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssetDetail {
    Supply(String),
    MetadataUri(String),
}

/// Record of a token or NFT created in this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedAsset {
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub detail: AssetDetail,
    pub signature: Signature,
    pub is_nft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRecord {
    pub address: Pubkey,
    pub name: String,
    pub symbol: String,
    pub metadata_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionMembership {
    pub nft_mint: Pubkey,
    pub collection_mint: Pubkey,
    pub signature: Signature,
}

// endregion: --- Creation results
