//! In-memory collaborators for unit tests.
//!
//! [`MockLedger`] executes the system, associated-token and token program
//! instructions the flows emit, so create-then-discover scenarios can run
//! without a validator.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lib_core::{AppError, Result};
use parking_lot::Mutex;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use solana_system_interface::instruction::SystemInstruction;
use spl_token::instruction::TokenInstruction;

use crate::service::{ContentStore, CreatedNft, MetadataSdk, NftRequest, RpcConnection, WalletSigner};
use crate::spl_token::{associated_token_address, MINT_SIZE};
use crate::types::{ProgramVariant, RawTokenAccount, TokenHolding, TokenMetadata};

// region: --- Ledger

#[derive(Debug, Clone)]
enum MockAccount {
    Plain { data: Vec<u8> },
    Mint { decimals: u8 },
    Token {
        program: ProgramVariant,
        mint: Pubkey,
        owner: Pubkey,
        amount: u64,
        decimals: u8,
        delegate: Option<Pubkey>,
    },
}

type ErrorFactory = Box<dyn Fn() -> AppError + Send + Sync>;

#[derive(Default)]
struct LedgerState {
    /// Insertion ordered.
    accounts: Vec<(Pubkey, MockAccount)>,
    sent: Vec<Transaction>,
    failing_queries: HashSet<ProgramVariant>,
    confirmation_error: Option<String>,
}

impl LedgerState {
    fn get(&self, address: &Pubkey) -> Option<&MockAccount> {
        self.accounts.iter().find(|(a, _)| a == address).map(|(_, acc)| acc)
    }

    fn get_mut(&mut self, address: &Pubkey) -> Option<&mut MockAccount> {
        self.accounts.iter_mut().find(|(a, _)| a == address).map(|(_, acc)| acc)
    }

    fn put(&mut self, address: Pubkey, account: MockAccount) {
        match self.get_mut(&address) {
            Some(existing) => *existing = account,
            None => self.accounts.push((address, account)),
        }
    }

    fn mint_decimals(&self, mint: &Pubkey) -> u8 {
        match self.get(mint) {
            Some(MockAccount::Mint { decimals }) => *decimals,
            _ => 0,
        }
    }

    fn adjust(&mut self, account: &Pubkey, delta: i128) -> Result<()> {
        match self.get_mut(account) {
            Some(MockAccount::Token { amount, .. }) => {
                let updated = *amount as i128 + delta;
                if updated < 0 {
                    return Err(AppError::Submission {
                        message: "Transaction simulation failed".to_string(),
                        logs: vec!["Program log: Error: insufficient funds".to_string()],
                    });
                }
                *amount = updated as u64;
                Ok(())
            }
            _ => Err(AppError::Submission {
                message: format!("account {} is not a token account", account),
                logs: vec![],
            }),
        }
    }

    fn apply(&mut self, program_id: &Pubkey, keys: &[Pubkey], data: &[u8]) -> Result<()> {
        let key = |i: usize| keys[i];

        if *program_id == solana_system_interface::program::ID {
            if let Ok(SystemInstruction::CreateAccount { space, .. }) = bincode::deserialize(data) {
                self.put(key(1), MockAccount::Plain { data: vec![0; space as usize] });
            }
            return Ok(());
        }

        if *program_id == spl_associated_token_account::id() {
            let program = ProgramVariant::from_program_id(&key(5)).unwrap_or(ProgramVariant::Token);
            let decimals = self.mint_decimals(&key(3));
            self.put(
                key(1),
                MockAccount::Token {
                    program,
                    mint: key(3),
                    owner: key(2),
                    amount: 0,
                    decimals,
                    delegate: None,
                },
            );
            return Ok(());
        }

        if ProgramVariant::from_program_id(program_id).is_none() {
            return Ok(());
        }

        let instruction = TokenInstruction::unpack(data)
            .map_err(|e| AppError::Internal(format!("bad token instruction: {}", e)))?;
        match instruction {
            TokenInstruction::InitializeMint { decimals, .. } => {
                self.put(key(0), MockAccount::Mint { decimals });
            }
            TokenInstruction::MintTo { amount } => self.adjust(&key(1), amount as i128)?,
            TokenInstruction::TransferChecked { amount, .. } => {
                self.adjust(&key(0), -(amount as i128))?;
                self.adjust(&key(2), amount as i128)?;
            }
            TokenInstruction::BurnChecked { amount, .. } => self.adjust(&key(0), -(amount as i128))?,
            TokenInstruction::ApproveChecked { .. } => {
                if let Some(MockAccount::Token { delegate, .. }) = self.get_mut(&key(0)) {
                    *delegate = Some(key(2));
                }
            }
            TokenInstruction::Revoke => {
                if let Some(MockAccount::Token { delegate, .. }) = self.get_mut(&key(0)) {
                    *delegate = None;
                }
            }
            TokenInstruction::CloseAccount => self.accounts.retain(|(a, _)| *a != key(0)),
            _ => {}
        }
        Ok(())
    }
}

/// In-memory chain implementing [`RpcConnection`].
pub struct MockLedger {
    state: Mutex<LedgerState>,
    send_error: Mutex<Option<ErrorFactory>>,
    calls: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            send_error: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn add_mint(&self, mint: &Pubkey, decimals: u8, _program: ProgramVariant) {
        self.state.lock().put(*mint, MockAccount::Mint { decimals });
    }

    /// Create `owner`'s associated account for `mint` holding `amount`.
    pub fn add_holding(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        program: ProgramVariant,
        amount: u64,
        decimals: u8,
    ) -> Pubkey {
        let address = associated_token_address(owner, mint, program);
        self.state.lock().put(
            address,
            MockAccount::Token {
                program,
                mint: *mint,
                owner: *owner,
                amount,
                decimals,
                delegate: None,
            },
        );
        address
    }

    pub fn add_account(&self, address: &Pubkey, data: Vec<u8>) {
        self.state.lock().put(*address, MockAccount::Plain { data });
    }

    /// Current holding of `owner` for `mint` (panics if absent).
    pub fn holding(&self, owner: &Pubkey, mint: &Pubkey) -> TokenHolding {
        let state = self.state.lock();
        state
            .accounts
            .iter()
            .find_map(|(address, account)| match account {
                MockAccount::Token {
                    program,
                    mint: m,
                    owner: o,
                    amount,
                    decimals,
                    delegate,
                } if m == mint && o == owner => Some(TokenHolding::from_raw(
                    RawTokenAccount {
                        address: *address,
                        mint: *m,
                        owner: *o,
                        amount: *amount,
                        decimals: *decimals,
                        delegate: *delegate,
                    },
                    *program,
                )),
                _ => None,
            })
            .expect("holding exists")
    }

    pub fn fail_token_query(&self, program: ProgramVariant) {
        self.state.lock().failing_queries.insert(program);
    }

    pub fn fail_send_with(&self, factory: impl Fn() -> AppError + Send + Sync + 'static) {
        *self.send_error.lock() = Some(Box::new(factory));
    }

    pub fn fail_confirmation(&self, reason: &str) {
        self.state.lock().confirmation_error = Some(reason.to_string());
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().sent.clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RpcConnection for MockLedger {
    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program: ProgramVariant,
    ) -> Result<Vec<RawTokenAccount>> {
        self.count();
        let state = self.state.lock();
        if state.failing_queries.contains(&program) {
            return Err(AppError::Rpc("failed to get token accounts".to_string()));
        }
        Ok(state
            .accounts
            .iter()
            .filter_map(|(address, account)| match account {
                MockAccount::Token {
                    program: p,
                    mint,
                    owner: o,
                    amount,
                    decimals,
                    delegate,
                } if *p == program && o == owner => Some(RawTokenAccount {
                    address: *address,
                    mint: *mint,
                    owner: *o,
                    amount: *amount,
                    decimals: *decimals,
                    delegate: *delegate,
                }),
                _ => None,
            })
            .collect())
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        self.count();
        Ok(self.state.lock().get(address).is_some())
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        self.count();
        Ok(self.state.lock().get(address).map(|account| match account {
            MockAccount::Plain { data } => data.clone(),
            MockAccount::Mint { .. } => vec![0; MINT_SIZE],
            MockAccount::Token { .. } => vec![0; 165],
        }))
    }

    async fn token_balance(&self, account: &Pubkey) -> Result<u64> {
        self.count();
        match self.state.lock().get(account) {
            Some(MockAccount::Token { amount, .. }) => Ok(*amount),
            _ => Err(AppError::Rpc("could not find account".to_string())),
        }
    }

    async fn token_delegate(&self, account: &Pubkey) -> Result<Option<Pubkey>> {
        self.count();
        match self.state.lock().get(account) {
            Some(MockAccount::Token { delegate, .. }) => Ok(*delegate),
            _ => Err(AppError::Rpc("could not find account".to_string())),
        }
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.count();
        Ok(Hash::new_from_array([7; 32]))
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        self.count();
        Ok((data_len as u64 + 128) * 6_960)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.count();
        if let Some(factory) = self.send_error.lock().as_ref() {
            return Err(factory());
        }
        if !transaction.is_signed() {
            return Err(AppError::Submission {
                message: "Transaction signature verification failure".to_string(),
                logs: vec![],
            });
        }

        let mut state = self.state.lock();
        let message = &transaction.message;
        for compiled in &message.instructions {
            let program_id = message.account_keys[compiled.program_id_index as usize];
            let keys: Vec<Pubkey> = compiled
                .accounts
                .iter()
                .map(|&i| message.account_keys[i as usize])
                .collect();
            state.apply(&program_id, &keys, &compiled.data)?;
        }
        state.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn confirm_transaction(&self, _signature: &Signature) -> Result<()> {
        self.count();
        match &self.state.lock().confirmation_error {
            Some(reason) => Err(AppError::Confirmation(reason.clone())),
            None => Ok(()),
        }
    }
}

// endregion: --- Ledger

// region: --- Wallet

pub struct MockWallet {
    keypair: Keypair,
    reject: Mutex<bool>,
    sign_calls: AtomicUsize,
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            keypair: Keypair::new(),
            reject: Mutex::new(false),
            sign_calls: AtomicUsize::new(0),
        }
    }

    pub fn reject_signing(&self) {
        *self.reject.lock() = true;
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletSigner for MockWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(&self, transaction: &mut Transaction) -> Result<()> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if *self.reject.lock() {
            return Err(AppError::Rejected("User rejected the request.".to_string()));
        }
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}

// endregion: --- Wallet

// region: --- Metadata

#[derive(Default)]
pub struct MockMetadata {
    records: Mutex<Vec<TokenMetadata>>,
    failing: Mutex<HashSet<Pubkey>>,
    create_failures: Mutex<VecDeque<AppError>>,
    created: Mutex<Vec<NftRequest>>,
    collections: Mutex<HashMap<Pubkey, Pubkey>>,
    create_calls: AtomicUsize,
}

impl MockMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mint: &Pubkey, name: &str, symbol: &str) -> TokenMetadata {
        TokenMetadata {
            mint: *mint,
            update_authority: Pubkey::new_unique(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            uri: format!("https://arweave.net/{}", mint),
            seller_fee_basis_points: 500,
            creators: vec![],
            collection: None,
        }
    }

    pub fn insert(&self, record: TokenMetadata) {
        self.records.lock().push(record);
    }

    pub fn fail_lookup(&self, mint: &Pubkey) {
        self.failing.lock().insert(*mint);
    }

    /// Queue errors returned by the next `create_nft` calls.
    pub fn fail_create_with(&self, errors: Vec<AppError>) {
        self.create_failures.lock().extend(errors);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<NftRequest> {
        self.created.lock().clone()
    }

    pub fn collection_of(&self, nft_mint: &Pubkey) -> Option<Pubkey> {
        self.collections.lock().get(nft_mint).copied()
    }
}

#[async_trait]
impl MetadataSdk for MockMetadata {
    async fn find_by_mint(&self, mint: &Pubkey) -> Result<Option<TokenMetadata>> {
        if self.failing.lock().contains(mint) {
            return Err(AppError::Rpc("metadata lookup failed".to_string()));
        }
        Ok(self.records.lock().iter().find(|r| r.mint == *mint).cloned())
    }

    async fn find_all_by_owner(&self, _owner: &Pubkey) -> Result<Vec<TokenMetadata>> {
        Ok(self.records.lock().clone())
    }

    async fn create_nft(&self, request: &NftRequest) -> Result<CreatedNft> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.create_failures.lock().pop_front() {
            return Err(err);
        }
        let mint = Pubkey::new_unique();
        let mut record = Self::record(&mint, &request.name, &request.symbol);
        record.uri = request.uri.clone();
        self.insert(record);
        self.created.lock().push(request.clone());
        Ok(CreatedNft {
            mint,
            signature: Signature::default(),
        })
    }

    async fn set_collection(
        &self,
        nft_mint: &Pubkey,
        collection_mint: &Pubkey,
    ) -> Result<Signature> {
        self.collections.lock().insert(*nft_mint, *collection_mint);
        Ok(Signature::default())
    }
}

// endregion: --- Metadata

// region: --- Storage

#[derive(Default)]
pub struct MockStore {
    uploads: Mutex<Vec<(Vec<u8>, Vec<(String, String)>)>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<(Vec<u8>, Vec<(String, String)>)> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl ContentStore for MockStore {
    async fn upload(&self, data: Vec<u8>, tags: &[(&str, &str)]) -> Result<String> {
        let mut uploads = self.uploads.lock();
        uploads.push((
            data,
            tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        ));
        Ok(format!("content-{}", uploads.len()))
    }

    fn uri_for(&self, id: &str) -> String {
        format!("https://arweave.net/{}", id)
    }
}

// endregion: --- Storage
