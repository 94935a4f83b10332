//! # Token Discovery
//!
//! Enumerates the connected wallet's token accounts across both program
//! variants and attaches display metadata where a lookup succeeds.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use lib_core::{NotificationService, Result};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, error, info, instrument};

use crate::service::{MetadataSdk, RpcConnection};
use crate::types::{ProgramVariant, TokenHolding};

pub struct TokenDiscovery {
    rpc: Arc<dyn RpcConnection>,
    metadata: Arc<dyn MetadataSdk>,
}

impl TokenDiscovery {
    pub fn new(rpc: Arc<dyn RpcConnection>, metadata: Arc<dyn MetadataSdk>) -> Self {
        Self { rpc, metadata }
    }

    /// Holdings of `owner`: SPL Token accounts first, then Token-2022.
    ///
    /// Either program query failing fails the whole pass. Metadata lookup
    /// failures only leave that holding's metadata empty. A mint seen twice
    /// keeps its first account.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn discover(&self, owner: &Pubkey) -> Result<Vec<TokenHolding>> {
        let (classic, token_2022) = tokio::try_join!(
            self.rpc.token_accounts_by_owner(owner, ProgramVariant::Token),
            self.rpc.token_accounts_by_owner(owner, ProgramVariant::Token2022),
        )?;

        let mut seen = HashSet::new();
        let mut holdings: Vec<TokenHolding> = classic
            .into_iter()
            .map(|raw| TokenHolding::from_raw(raw, ProgramVariant::Token))
            .chain(
                token_2022
                    .into_iter()
                    .map(|raw| TokenHolding::from_raw(raw, ProgramVariant::Token2022)),
            )
            .filter(|holding| seen.insert(holding.mint))
            .collect();

        let mints: Vec<Pubkey> = holdings.iter().map(|h| h.mint).collect();
        let lookups = join_all(mints.iter().map(|mint| self.metadata.find_by_mint(mint))).await;
        for (holding, lookup) in holdings.iter_mut().zip(lookups) {
            match lookup {
                Ok(metadata) => holding.metadata = metadata,
                Err(e) => debug!(mint = %holding.mint, "Metadata lookup failed: {}", e),
            }
        }

        info!("Discovered {} token holdings", holdings.len());
        Ok(holdings)
    }

    /// [`discover`](Self::discover), reporting a failure as one notification.
    pub async fn refresh(
        &self,
        owner: &Pubkey,
        notifications: &NotificationService,
    ) -> Option<Vec<TokenHolding>> {
        match self.discover(owner).await {
            Ok(holdings) => Some(holdings),
            Err(e) => {
                error!("Token discovery failed: {}", e);
                notifications.error("Failed to fetch tokens");
                None
            }
        }
    }
}
