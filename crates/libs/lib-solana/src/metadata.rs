//! # Token Metadata Program
//!
//! [`MetaplexClient`] implements [`MetadataSdk`] against the Token Metadata
//! program: it derives metadata/edition PDAs, decodes metadata accounts, and
//! encodes the three instructions the app needs.
//!
//! ## Instruction layouts (Borsh)
//!
//! | Instruction | Discriminator | Arguments |
//! |-------------|---------------|-----------|
//! | `CreateMetadataAccountV3` | 33 | `DataV2`, `is_mutable: bool`, `collection_details: Option<CollectionDetails>` |
//! | `CreateMasterEditionV3` | 17 | `max_supply: Option<u64>` |
//! | `UpdateMetadataAccountV2` | 15 | `Option<DataV2>`, `Option<Pubkey>`, `Option<bool>`, `Option<bool>` |

use std::sync::Arc;

use async_trait::async_trait;
use borsh::{BorshDeserialize, BorshSerialize};
use lib_core::{AppError, Result};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use solana_system_interface::program as system_program;
use tracing::{debug, info, instrument, warn};

use crate::service::{CreatedNft, MetadataSdk, NftRequest, RpcConnection, WalletSigner};
use crate::spl_token::{self, MINT_SIZE};
use crate::types::{CollectionRef, Creator, ProgramVariant, TokenMetadata};

pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

const CREATE_METADATA_ACCOUNT_V3: u8 = 33;
const CREATE_MASTER_EDITION_V3: u8 = 17;
const UPDATE_METADATA_ACCOUNT_V2: u8 = 15;

/// Account key tag of a `MetadataV1` account.
const METADATA_V1_KEY: u8 = 4;

pub fn metadata_address(mint: &Pubkey) -> Pubkey {
    let program = TOKEN_METADATA_PROGRAM_ID;
    Pubkey::find_program_address(&[b"metadata", program.as_ref(), mint.as_ref()], &program).0
}

pub fn master_edition_address(mint: &Pubkey) -> Pubkey {
    let program = TOKEN_METADATA_PROGRAM_ID;
    Pubkey::find_program_address(&[b"metadata", program.as_ref(), mint.as_ref(), b"edition"], &program).0
}

// region: --- Borsh

/// `DataV2` argument of the create/update instructions.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DataV2 {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Option<Vec<Creator>>,
    pub collection: Option<CollectionRef>,
    pub uses: Option<Uses>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum UseMethod {
    Burn,
    Multiple,
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Uses {
    pub use_method: UseMethod,
    pub remaining: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum CollectionDetails {
    V1 { size: u64 },
}

#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct CreateMetadataAccountArgsV3 {
    data: DataV2,
    is_mutable: bool,
    collection_details: Option<CollectionDetails>,
}

#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct CreateMasterEditionArgs {
    max_supply: Option<u64>,
}

#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct UpdateMetadataAccountArgsV2 {
    data: Option<DataV2>,
    update_authority: Option<Pubkey>,
    primary_sale_happened: Option<bool>,
    is_mutable: Option<bool>,
}

/// `Data` as stored in a metadata account (no collection or uses).
#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct AccountData {
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    creators: Option<Vec<Creator>>,
}

/// Fields every `MetadataV1` account has. Newer accounts append
/// `edition_nonce`, `token_standard` and `collection` after these.
#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct MetadataAccount {
    key: u8,
    update_authority: Pubkey,
    mint: Pubkey,
    data: AccountData,
    primary_sale_happened: bool,
    is_mutable: bool,
}

fn account_shape_error(e: std::io::Error) -> AppError {
    AppError::Internal(format!("Unexpected account shape: {}", e))
}

/// Read an optional trailing field, treating a missing or unreadable tail as absent.
fn trailing<T: BorshDeserialize>(buf: &mut &[u8]) -> Option<T> {
    if buf.is_empty() {
        return None;
    }
    Option::<T>::deserialize(buf).ok().flatten()
}

/// Decode a `MetadataV1` account.
///
/// Accounts are zero padded past their last field, so only the fixed prefix
/// must parse; older accounts stop after `is_mutable`.
pub fn decode_metadata(data: &[u8]) -> Result<TokenMetadata> {
    let key = data.first().copied().unwrap_or_default();
    if key != METADATA_V1_KEY {
        return Err(AppError::Internal(format!(
            "Unexpected account shape: metadata key {} is not MetadataV1",
            key
        )));
    }

    let mut buf = data;
    let account = MetadataAccount::deserialize(&mut buf).map_err(account_shape_error)?;
    let _edition_nonce: Option<u8> = trailing(&mut buf);
    let _token_standard: Option<u8> = trailing(&mut buf);
    let collection: Option<CollectionRef> = trailing(&mut buf);

    let unpad = |s: String| s.trim_end_matches('\0').to_string();
    Ok(TokenMetadata {
        mint: account.mint,
        update_authority: account.update_authority,
        name: unpad(account.data.name),
        symbol: unpad(account.data.symbol),
        uri: unpad(account.data.uri),
        seller_fee_basis_points: account.data.seller_fee_basis_points,
        creators: account.data.creators.unwrap_or_default(),
        collection,
    })
}

/// Instruction data: discriminator byte followed by the Borsh-encoded arguments.
fn instruction_data<T: BorshSerialize>(discriminator: u8, args: &T) -> Result<Vec<u8>> {
    let mut data = vec![discriminator];
    args.serialize(&mut data)
        .map_err(|e| AppError::Internal(format!("Failed to encode metadata instruction: {}", e)))?;
    Ok(data)
}

// endregion: --- Borsh

// region: --- Instructions

pub fn create_metadata_account_v3(
    mint: &Pubkey,
    authority: &Pubkey,
    data: &DataV2,
    is_collection: bool,
) -> Result<Instruction> {
    let args = CreateMetadataAccountArgsV3 {
        data: data.clone(),
        is_mutable: true,
        collection_details: is_collection.then_some(CollectionDetails::V1 { size: 0 }),
    };

    Ok(Instruction::new_with_bytes(
        TOKEN_METADATA_PROGRAM_ID,
        &instruction_data(CREATE_METADATA_ACCOUNT_V3, &args)?,
        vec![
            AccountMeta::new(metadata_address(mint), false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    ))
}

pub fn create_master_edition_v3(
    mint: &Pubkey,
    authority: &Pubkey,
    max_supply: Option<u64>,
) -> Result<Instruction> {
    let args = CreateMasterEditionArgs { max_supply };

    Ok(Instruction::new_with_bytes(
        TOKEN_METADATA_PROGRAM_ID,
        &instruction_data(CREATE_MASTER_EDITION_V3, &args)?,
        vec![
            AccountMeta::new(master_edition_address(mint), false),
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(*authority, true),
            AccountMeta::new(metadata_address(mint), false),
            AccountMeta::new_readonly(ProgramVariant::Token.program_id(), false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    ))
}

/// Replace the metadata's `DataV2`, leaving authority, sale flag and mutability alone.
pub fn update_metadata_account_v2(
    mint: &Pubkey,
    update_authority: &Pubkey,
    data: &DataV2,
) -> Result<Instruction> {
    let args = UpdateMetadataAccountArgsV2 {
        data: Some(data.clone()),
        update_authority: None,
        primary_sale_happened: None,
        is_mutable: None,
    };

    Ok(Instruction::new_with_bytes(
        TOKEN_METADATA_PROGRAM_ID,
        &instruction_data(UPDATE_METADATA_ACCOUNT_V2, &args)?,
        vec![
            AccountMeta::new(metadata_address(mint), false),
            AccountMeta::new_readonly(*update_authority, true),
        ],
    ))
}

// endregion: --- Instructions

/// [`MetadataSdk`] over an RPC connection and the connected wallet.
pub struct MetaplexClient {
    rpc: Arc<dyn RpcConnection>,
    wallet: Arc<dyn WalletSigner>,
}

impl MetaplexClient {
    pub fn new(rpc: Arc<dyn RpcConnection>, wallet: Arc<dyn WalletSigner>) -> Self {
        Self { rpc, wallet }
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        extra_signer: Option<&Keypair>,
    ) -> Result<Signature> {
        let owner = self.wallet.pubkey();
        let blockhash = self.rpc.latest_blockhash().await?;
        let mut message = Message::new(instructions, Some(&owner));
        message.recent_blockhash = blockhash;
        let mut transaction = Transaction::new_unsigned(message);
        if let Some(signer) = extra_signer {
            transaction
                .try_partial_sign(&[signer], blockhash)
                .map_err(|e| AppError::Internal(format!("Failed to sign with mint keypair: {}", e)))?;
        }
        self.wallet.sign_transaction(&mut transaction).await?;

        let signature = self.rpc.send_transaction(&transaction).await?;
        self.rpc.confirm_transaction(&signature).await?;
        Ok(signature)
    }
}

#[async_trait]
impl MetadataSdk for MetaplexClient {
    async fn find_by_mint(&self, mint: &Pubkey) -> Result<Option<TokenMetadata>> {
        match self.rpc.account_data(&metadata_address(mint)).await? {
            Some(data) => decode_metadata(&data).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn find_all_by_owner(&self, owner: &Pubkey) -> Result<Vec<TokenMetadata>> {
        let mut nfts = Vec::new();
        for program in ProgramVariant::ALL {
            let accounts = self.rpc.token_accounts_by_owner(owner, program).await?;
            for account in accounts.into_iter().filter(|a| a.amount == 1 && a.decimals == 0) {
                match self.find_by_mint(&account.mint).await {
                    Ok(Some(metadata)) => nfts.push(metadata),
                    Ok(None) => {}
                    Err(e) => warn!(mint = %account.mint, "Skipping NFT with unreadable metadata: {}", e),
                }
            }
        }
        debug!("Found {} NFTs", nfts.len());
        Ok(nfts)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_nft(&self, request: &NftRequest) -> Result<CreatedNft> {
        let owner = self.wallet.pubkey();
        let mint = Keypair::new();
        let mint_pubkey = mint.pubkey();
        let rent = self.rpc.minimum_balance_for_rent_exemption(MINT_SIZE).await?;

        let data = DataV2 {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            uri: request.uri.clone(),
            seller_fee_basis_points: request.seller_fee_basis_points,
            creators: Some(vec![Creator {
                address: owner,
                verified: true,
                share: 100,
            }]),
            collection: None,
            uses: None,
        };

        let mut instructions =
            spl_token::new_mint_instructions(ProgramVariant::Token, &owner, &mint_pubkey, 0, 1, rent)?;
        instructions.push(create_metadata_account_v3(&mint_pubkey, &owner, &data, request.is_collection)?);
        instructions.push(create_master_edition_v3(&mint_pubkey, &owner, Some(0))?);

        let signature = self.submit(&instructions, Some(&mint)).await?;
        info!(mint = %mint_pubkey, %signature, "NFT created");
        Ok(CreatedNft {
            mint: mint_pubkey,
            signature,
        })
    }

    #[instrument(skip(self))]
    async fn set_collection(
        &self,
        nft_mint: &Pubkey,
        collection_mint: &Pubkey,
    ) -> Result<Signature> {
        let current = self.find_by_mint(nft_mint).await?.ok_or_else(|| {
            AppError::Precondition(format!("Unexpected account shape: no metadata for {}", nft_mint))
        })?;

        let data = DataV2 {
            name: current.name,
            symbol: current.symbol,
            uri: current.uri,
            seller_fee_basis_points: current.seller_fee_basis_points,
            creators: (!current.creators.is_empty()).then_some(current.creators),
            collection: Some(CollectionRef {
                verified: false,
                key: *collection_mint,
            }),
            uses: None,
        };

        let ix = update_metadata_account_v2(nft_mint, &current.update_authority, &data)?;
        self.submit(&[ix], None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> DataV2 {
        DataV2 {
            name: "Test".to_string(),
            symbol: "TST".to_string(),
            uri: "https://arweave.net/abc".to_string(),
            seller_fee_basis_points: 500,
            creators: None,
            collection: None,
            uses: None,
        }
    }

    fn args<T: BorshDeserialize>(ix: &Instruction) -> T {
        T::try_from_slice(&ix.data[1..]).unwrap()
    }

    /// Encode an on-chain style metadata account: padded strings, optional
    /// tail, then zero fill up to the allocated size.
    fn encode_account(
        mint: &Pubkey,
        authority: &Pubkey,
        tail: Option<Option<CollectionRef>>,
    ) -> Vec<u8> {
        let padded = |s: &str, len: usize| format!("{}{}", s, "\0".repeat(len - s.len()));
        let account = MetadataAccount {
            key: METADATA_V1_KEY,
            update_authority: *authority,
            mint: *mint,
            data: AccountData {
                name: padded("Test", 32),
                symbol: padded("TST", 10),
                uri: padded("https://arweave.net/abc", 200),
                seller_fee_basis_points: 500,
                creators: Some(vec![Creator {
                    address: *authority,
                    verified: true,
                    share: 100,
                }]),
            },
            primary_sale_happened: false,
            is_mutable: true,
        };

        let mut data = borsh::to_vec(&account).unwrap();
        if let Some(collection) = tail {
            // edition_nonce, token_standard, collection
            let tail: (Option<u8>, Option<u8>, Option<CollectionRef>) = (Some(255), Some(0), collection);
            data.extend(borsh::to_vec(&tail).unwrap());
            data.resize(679, 0);
        }
        data
    }

    #[test]
    fn test_create_metadata_layout() {
        let (mint, authority) = (Pubkey::new_unique(), Pubkey::new_unique());
        let ix = create_metadata_account_v3(&mint, &authority, &sample_data(), false).unwrap();

        assert_eq!(ix.program_id, TOKEN_METADATA_PROGRAM_ID);
        assert_eq!(ix.data[0], 33);
        assert_eq!(&ix.data[1..9], &[4, 0, 0, 0, b'T', b'e', b's', b't']);
        let decoded: CreateMetadataAccountArgsV3 = args(&ix);
        assert_eq!(decoded.data, sample_data());
        assert!(decoded.is_mutable);
        assert_eq!(decoded.collection_details, None);
        assert_eq!(ix.accounts[0].pubkey, metadata_address(&mint));
        assert_eq!(ix.accounts[5].pubkey, system_program::ID);
    }

    #[test]
    fn test_collection_details_encoded_for_collections() {
        let (mint, authority) = (Pubkey::new_unique(), Pubkey::new_unique());
        let ix = create_metadata_account_v3(&mint, &authority, &sample_data(), true).unwrap();

        let decoded: CreateMetadataAccountArgsV3 = args(&ix);
        assert_eq!(decoded.collection_details, Some(CollectionDetails::V1 { size: 0 }));
        // is_mutable, Some, V1, size
        assert_eq!(&ix.data[ix.data.len() - 11..], &[1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_master_edition_layout() {
        let (mint, authority) = (Pubkey::new_unique(), Pubkey::new_unique());
        let ix = create_master_edition_v3(&mint, &authority, Some(0)).unwrap();
        assert_eq!(ix.data, vec![17, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ix.accounts[0].pubkey, master_edition_address(&mint));
        assert_eq!(ix.accounts.len(), 8);
    }

    #[test]
    fn test_update_sets_collection_and_leaves_rest() {
        let (mint, authority, collection) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let mut data = sample_data();
        data.collection = Some(CollectionRef {
            verified: false,
            key: collection,
        });

        let ix = update_metadata_account_v2(&mint, &authority, &data).unwrap();

        assert_eq!(&ix.data[0..2], &[15, 1]);
        let decoded: UpdateMetadataAccountArgsV2 = args(&ix);
        assert_eq!(decoded.data.and_then(|d| d.collection).map(|c| c.key), Some(collection));
        assert_eq!(decoded.update_authority, None);
        assert_eq!(decoded.primary_sale_happened, None);
        assert_eq!(decoded.is_mutable, None);
        assert_eq!(&ix.data[ix.data.len() - 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_trims_padding_and_reads_collection() {
        let (mint, authority, collection) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let data = encode_account(
            &mint,
            &authority,
            Some(Some(CollectionRef {
                verified: true,
                key: collection,
            })),
        );

        let metadata = decode_metadata(&data).unwrap();

        assert_eq!(metadata.mint, mint);
        assert_eq!(metadata.name, "Test");
        assert_eq!(metadata.symbol, "TST");
        assert_eq!(metadata.uri, "https://arweave.net/abc");
        assert_eq!(metadata.seller_fee_basis_points, 500);
        assert_eq!(metadata.creators.len(), 1);
        assert_eq!(metadata.collection.map(|c| c.key), Some(collection));
    }

    #[test]
    fn test_decode_account_without_optional_tail() {
        let (mint, authority) = (Pubkey::new_unique(), Pubkey::new_unique());
        let metadata = decode_metadata(&encode_account(&mint, &authority, None)).unwrap();
        assert_eq!(metadata.update_authority, authority);
        assert!(metadata.collection.is_none());
    }

    #[test]
    fn test_decode_rejects_wrong_key_and_truncation() {
        let (mint, authority) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut data = encode_account(&mint, &authority, Some(None));

        let err = decode_metadata(&data[..40]).unwrap_err();
        assert!(err.to_string().contains("Unexpected account shape"));
        assert!(decode_metadata(&[]).is_err());

        data[0] = 6;
        let err = decode_metadata(&data).unwrap_err();
        assert!(err.to_string().contains("Unexpected account shape"));
    }

    #[tokio::test]
    async fn test_find_by_mint_without_account_is_none() {
        use crate::test_support::{MockLedger, MockWallet};

        let client = MetaplexClient::new(Arc::new(MockLedger::new()), Arc::new(MockWallet::new()));
        assert_eq!(client.find_by_mint(&Pubkey::new_unique()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_by_mint_decodes_account() {
        use crate::test_support::{MockLedger, MockWallet};

        let ledger = Arc::new(MockLedger::new());
        let (mint, authority) = (Pubkey::new_unique(), Pubkey::new_unique());
        ledger.add_account(&metadata_address(&mint), encode_account(&mint, &authority, Some(None)));
        let client = MetaplexClient::new(ledger, Arc::new(MockWallet::new()));

        let metadata = client.find_by_mint(&mint).await.unwrap().unwrap();
        assert_eq!(metadata.update_authority, authority);
        assert!(metadata.collection.is_none());
    }
}
