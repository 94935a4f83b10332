//! # Service Bundle
//!
//! The collaborators every flow runs against, built once from [`Config`] and
//! shared by the spawned tasks.

use std::sync::Arc;

use lib_core::{Config, Result};
use lib_solana::{
    ActionOrchestrator, CollectionManager, ContentStore, CreationFlow, HttpContentStore, JupiterClient,
    KeypairWallet, MetadataSdk, MetaplexClient, RetryPolicy, RpcConnection, SolanaClient, SwapAggregator,
    SwapService, TokenDiscovery, WalletSigner,
};
use tracing::info;

#[derive(Clone)]
pub struct Services {
    pub rpc: Arc<dyn RpcConnection>,
    pub wallet: Arc<dyn WalletSigner>,
    pub metadata: Arc<dyn MetadataSdk>,
    pub storage: Option<Arc<dyn ContentStore>>,
    pub aggregator: Arc<dyn SwapAggregator>,
    pub retry: RetryPolicy,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let rpc: Arc<dyn RpcConnection> = Arc::new(SolanaClient::from_config(config)?);
        let wallet: Arc<dyn WalletSigner> = Arc::new(KeypairWallet::from_config(config)?);
        let metadata: Arc<dyn MetadataSdk> = Arc::new(MetaplexClient::new(rpc.clone(), wallet.clone()));
        let storage = HttpContentStore::from_config(config)?.map(|s| Arc::new(s) as Arc<dyn ContentStore>);
        let aggregator: Arc<dyn SwapAggregator> = Arc::new(JupiterClient::from_config(config)?);

        info!(
            wallet = %wallet.pubkey(),
            storage = storage.is_some(),
            "Services initialized"
        );

        Ok(Self {
            rpc,
            wallet,
            metadata,
            storage,
            aggregator,
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn discovery(&self) -> TokenDiscovery {
        TokenDiscovery::new(self.rpc.clone(), self.metadata.clone())
    }

    pub fn orchestrator(&self) -> ActionOrchestrator {
        ActionOrchestrator::new(self.rpc.clone(), self.wallet.clone())
    }

    pub fn creation(&self) -> CreationFlow {
        CreationFlow::new(
            self.rpc.clone(),
            self.wallet.clone(),
            self.metadata.clone(),
            self.storage.clone(),
            self.retry,
        )
    }

    pub fn collections(&self) -> CollectionManager {
        CollectionManager::new(self.rpc.clone(), self.metadata.clone(), self.storage.clone(), self.retry)
    }

    pub fn swap(&self) -> SwapService {
        SwapService::new(self.aggregator.clone(), self.rpc.clone(), self.wallet.clone())
    }
}
