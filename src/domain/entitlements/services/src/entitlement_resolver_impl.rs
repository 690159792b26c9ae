// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use time_source::SystemTimeSource;
use tokio::sync::RwLock;
use tollgate_accounts::{WalletAddress, WalletAddressConvertor};
use tollgate_entitlements::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct CachedResolution {
    resolution: OwnershipResolution,
    resolved_at: DateTime<Utc>,
}

/// Reads ownership from the gating contract.
///
/// Results are cached per requested wallet; only
/// [`ResolveMode::AllowCached`] reads are served from the cache.
pub struct EntitlementResolverImpl {
    contract_reader: Arc<dyn NftContractReader>,
    config: Arc<EntitlementsConfig>,
    time_source: Arc<dyn SystemTimeSource>,
    cache: RwLock<HashMap<WalletAddress, CachedResolution>>,
}

#[dill::component(pub)]
#[dill::interface(dyn EntitlementResolver)]
#[dill::scope(dill::Singleton)]
impl EntitlementResolverImpl {
    pub fn new(
        contract_reader: Arc<dyn NftContractReader>,
        config: Arc<EntitlementsConfig>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            contract_reader,
            config,
            time_source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    async fn cached(&self, wallet: &WalletAddress) -> Option<OwnershipResolution> {
        let now = self.time_source.now();
        let cache = self.cache.read().await;

        cache
            .get(wallet)
            .filter(|entry| now < entry.resolved_at + self.config.cache_ttl)
            .map(|entry| entry.resolution.clone())
    }

    async fn remember(&self, resolution: &OwnershipResolution) {
        let entry = CachedResolution {
            resolution: resolution.clone(),
            resolved_at: self.time_source.now(),
        };

        self.cache
            .write()
            .await
            .insert(resolution.wallet_address, entry);
    }

    /// Runs `read` until it succeeds, reverts or the attempt budget is spent
    async fn read_with_retry<T, F, Fut>(&self, mut read: F) -> Result<T, VerificationFailedError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ChainReadError>>,
    {
        let max_attempts = self.config.rpc_max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match read().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    tracing::warn!(error = %err, attempt, max_attempts, "Chain read failed, retrying");
                    self.time_source.sleep(self.config.rpc_backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(VerificationFailedError {
                        attempts: attempt,
                        last_error: err,
                    });
                }
            }
        }
    }

    async fn resolve_on_chain(
        &self,
        contract: &WalletAddress,
        wallet: &WalletAddress,
    ) -> Result<OwnershipResolution, VerificationFailedError> {
        let reader = self.contract_reader.as_ref();

        let balance = self
            .read_with_retry(|| reader.balance_of(contract, wallet))
            .await?;
        let owned_count = balance.saturating_to::<u64>();

        if balance.is_zero() {
            return Ok(OwnershipResolution::not_owned(*wallet, 0));
        }

        // Token ids found through the fallback check are already confirmed
        let (token_id, confirmed) = match self
            .read_with_retry(|| reader.token_of_owner_by_index(contract, wallet, 0))
            .await
        {
            Ok(token_id) => (token_id, false),
            Err(err) if is_revert(&err) => {
                match self.check_fallback_token(contract, wallet).await? {
                    Some(token_id) => (token_id, true),
                    None => return Ok(OwnershipResolution::not_owned(*wallet, owned_count)),
                }
            }
            Err(err) => return Err(err),
        };

        let is_owner = confirmed || self.is_owner_of(contract, wallet, token_id).await?;
        let owns = owned_count > 0 && is_owner;

        let metadata = if owns && self.config.fetch_metadata {
            self.fetch_metadata(contract, token_id).await
        } else {
            None
        };

        Ok(OwnershipResolution {
            wallet_address: *wallet,
            owns,
            token_id: Some(token_id),
            tier: if owns {
                self.config.classify(token_id)
            } else {
                Tier::None
            },
            owned_count,
            is_owner,
            metadata,
        })
    }

    /// Heuristic for contracts without enumeration: a single configured
    /// token id is checked with `ownerOf`
    async fn check_fallback_token(
        &self,
        contract: &WalletAddress,
        wallet: &WalletAddress,
    ) -> Result<Option<TokenId>, VerificationFailedError> {
        let Some(token_id) = self.config.fallback_token_id else {
            tracing::warn!("Contract lacks enumeration and no fallback token id is configured");
            return Ok(None);
        };

        tracing::debug!(%token_id, "Contract lacks enumeration, probing fallback token id");

        if self.is_owner_of(contract, wallet, token_id).await? {
            Ok(Some(token_id))
        } else {
            Ok(None)
        }
    }

    async fn is_owner_of(
        &self,
        contract: &WalletAddress,
        wallet: &WalletAddress,
        token_id: TokenId,
    ) -> Result<bool, VerificationFailedError> {
        let reader = self.contract_reader.as_ref();

        match self
            .read_with_retry(|| reader.owner_of(contract, token_id))
            .await
        {
            Ok(owner) => Ok(owner == *wallet),
            // Nonexistent tokens revert
            Err(err) if is_revert(&err) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn fetch_metadata(
        &self,
        contract: &WalletAddress,
        token_id: TokenId,
    ) -> Option<TokenMetadata> {
        match self.contract_reader.token_uri(contract, token_id).await {
            Ok(token_uri) => Some(TokenMetadata { token_uri }),
            Err(err) => {
                tracing::warn!(error = %err, %token_id, "Token metadata unavailable");
                None
            }
        }
    }
}

fn is_revert(err: &VerificationFailedError) -> bool {
    matches!(err.last_error, ChainReadError::Reverted { .. })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl EntitlementResolver for EntitlementResolverImpl {
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(wallet = %WalletAddressConvertor::lowercase_string(wallet), ?mode)
    )]
    async fn resolve(
        &self,
        wallet: &WalletAddress,
        mode: ResolveMode,
    ) -> Result<OwnershipResolution, ResolveEntitlementError> {
        let Some(contract) = self.config.contract_address else {
            return Err(ResolveEntitlementError::Configuration(
                EntitlementsConfigurationError {
                    reason: "gating contract address is not configured".to_string(),
                },
            ));
        };

        if mode == ResolveMode::AllowCached {
            if let Some(resolution) = self.cached(wallet).await {
                tracing::debug!(owns = resolution.owns, "Ownership served from cache");
                return Ok(resolution);
            }
        }

        let resolution = match self.resolve_on_chain(&contract, wallet).await {
            Ok(resolution) => resolution,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    last_error = %err.last_error,
                    "Ownership verification failed"
                );
                return Err(ResolveEntitlementError::VerificationFailed(err));
            }
        };

        tracing::debug!(
            owns = resolution.owns,
            tier = %resolution.tier,
            owned_count = resolution.owned_count,
            "Ownership resolved"
        );

        self.remember(&resolution).await;

        Ok(resolution)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
