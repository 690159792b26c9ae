// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use time_source::SystemTimeSource;
use tollgate_accounts::{AccountID, WalletAddress, WalletAddressConvertor};
use tollgate_entitlements::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct EntitlementSyncServiceImpl {
    resolver: Arc<dyn EntitlementResolver>,
    entitlement_repo: Arc<dyn EntitlementRepository>,
    time_source: Arc<dyn SystemTimeSource>,
}

#[dill::component(pub)]
#[dill::interface(dyn EntitlementSyncService)]
impl EntitlementSyncServiceImpl {
    pub fn new(
        resolver: Arc<dyn EntitlementResolver>,
        entitlement_repo: Arc<dyn EntitlementRepository>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            resolver,
            entitlement_repo,
            time_source,
        }
    }

    async fn store(&self, record: EntitlementRecord) -> Result<EntitlementRecord, SyncEntitlementError> {
        match self.entitlement_repo.upsert_entitlement(&record).await {
            Ok(stored) => Ok(stored),
            Err(UpsertEntitlementError::DuplicateWallet(e)) => {
                Err(SyncEntitlementError::WalletConflict(e))
            }
            Err(UpsertEntitlementError::Internal(e)) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl EntitlementSyncService for EntitlementSyncServiceImpl {
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(%user_id, wallet = %WalletAddressConvertor::lowercase_string(wallet))
    )]
    async fn sync(
        &self,
        user_id: &AccountID,
        wallet: &WalletAddress,
    ) -> Result<Option<EntitlementRecord>, SyncEntitlementError> {
        let resolution = self.resolver.resolve(wallet, ResolveMode::Fresh).await?;
        let now = self.time_source.now();

        let existing = match self.entitlement_repo.get_entitlement_by_user_id(user_id).await {
            Ok(existing) => Some(existing),
            Err(GetEntitlementError::NotFound(_)) => None,
            Err(GetEntitlementError::Internal(e)) => return Err(e.into()),
        };

        // Revocation is an out-of-band decision that chain state never lifts
        let revoked = existing
            .as_ref()
            .is_some_and(|record| record.status == EntitlementStatus::Revoked);

        if resolution.owns {
            let stored = self
                .store(EntitlementRecord {
                    user_id: user_id.clone(),
                    wallet_address: *wallet,
                    token_id: resolution.token_id,
                    tier: resolution.tier,
                    status: if revoked {
                        EntitlementStatus::Revoked
                    } else {
                        EntitlementStatus::Verified
                    },
                    usage: UsageCounters::default(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;

            if revoked {
                tracing::warn!(tier = %stored.tier, "Token held but entitlement stays revoked");
            } else {
                tracing::info!(tier = %stored.tier, "Entitlement verified");
            }
            return Ok(Some(stored));
        }

        let Some(existing) = existing else {
            return Ok(None);
        };

        let stored = self
            .store(EntitlementRecord {
                wallet_address: *wallet,
                token_id: None,
                tier: Tier::None,
                status: if revoked {
                    EntitlementStatus::Revoked
                } else {
                    EntitlementStatus::Expired
                },
                updated_at: now,
                ..existing
            })
            .await?;

        tracing::info!(status = %stored.status, "Token no longer held");
        Ok(Some(stored))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
