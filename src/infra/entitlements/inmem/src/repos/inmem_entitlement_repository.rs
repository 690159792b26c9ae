// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dill::*;
use tollgate_accounts::{AccountID, WalletAddress};

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryEntitlementRepository {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    records_by_user: HashMap<AccountID, EntitlementRecord>,
    user_by_wallet: HashMap<WalletAddress, AccountID>,
}

impl State {
    fn record_mut(
        &mut self,
        user_id: &AccountID,
    ) -> Result<&mut EntitlementRecord, EntitlementNotFoundError> {
        self.records_by_user
            .get_mut(user_id)
            .ok_or_else(|| EntitlementNotFoundError {
                user_id: user_id.clone(),
            })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[component(pub)]
#[interface(dyn EntitlementRepository)]
#[scope(Singleton)]
impl InMemoryEntitlementRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl EntitlementRepository for InMemoryEntitlementRepository {
    async fn get_entitlement_by_user_id(
        &self,
        user_id: &AccountID,
    ) -> Result<EntitlementRecord, GetEntitlementError> {
        let guard = self.state.lock().unwrap();

        guard
            .records_by_user
            .get(user_id)
            .cloned()
            .ok_or_else(|| {
                GetEntitlementError::NotFound(EntitlementNotFoundError {
                    user_id: user_id.clone(),
                })
            })
    }

    async fn upsert_entitlement(
        &self,
        record: &EntitlementRecord,
    ) -> Result<EntitlementRecord, UpsertEntitlementError> {
        let mut guard = self.state.lock().unwrap();

        let State {
            records_by_user,
            user_by_wallet,
        } = &mut *guard;

        if let Some(owner_id) = user_by_wallet.get(&record.wallet_address) {
            if *owner_id != record.user_id {
                return Err(UpsertEntitlementError::DuplicateWallet(
                    EntitlementDuplicateWalletError {
                        wallet_address: record.wallet_address,
                    },
                ));
            }
        }

        let stored = match records_by_user.get_mut(&record.user_id) {
            Some(existing) => {
                user_by_wallet.remove(&existing.wallet_address);

                existing.wallet_address = record.wallet_address;
                existing.token_id = record.token_id;
                existing.tier = record.tier;
                if existing.status != EntitlementStatus::Revoked {
                    existing.status = record.status;
                }
                existing.updated_at = record.updated_at;
                existing.clone()
            }
            None => {
                records_by_user.insert(record.user_id.clone(), record.clone());
                record.clone()
            }
        };

        user_by_wallet.insert(stored.wallet_address, stored.user_id.clone());

        Ok(stored)
    }

    async fn set_entitlement_status(
        &self,
        user_id: &AccountID,
        status: EntitlementStatus,
        now: DateTime<Utc>,
    ) -> Result<EntitlementRecord, SetEntitlementStatusError> {
        let mut guard = self.state.lock().unwrap();

        let record = guard
            .record_mut(user_id)
            .map_err(SetEntitlementStatusError::NotFound)?;
        record.status = status;
        record.updated_at = now;

        Ok(record.clone())
    }

    async fn increment_usage(
        &self,
        user_id: &AccountID,
        category: ResourceCategory,
        amount: u64,
        now: DateTime<Utc>,
    ) -> Result<UsageCounters, IncrementUsageError> {
        let mut guard = self.state.lock().unwrap();

        let record = guard
            .record_mut(user_id)
            .map_err(IncrementUsageError::NotFound)?;
        let counter = record.usage.usage_mut(category);
        *counter = counter.saturating_add(amount);
        record.updated_at = now;

        Ok(record.usage)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
