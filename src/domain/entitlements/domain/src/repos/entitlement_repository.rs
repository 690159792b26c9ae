// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use internal_error::InternalError;
use thiserror::Error;
use tollgate_accounts::{AccountID, WalletAddress};

use crate::{EntitlementRecord, EntitlementStatus, ResourceCategory, UsageCounters};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait EntitlementRepository: Send + Sync {
    async fn get_entitlement_by_user_id(
        &self,
        user_id: &AccountID,
    ) -> Result<EntitlementRecord, GetEntitlementError>;

    /// Inserts the record, or updates wallet, token, tier, status and
    /// `updated_at` of the existing record of the same user. Usage counters
    /// and `created_at` of an existing record are preserved, and a `revoked`
    /// status is never overwritten.
    async fn upsert_entitlement(
        &self,
        record: &EntitlementRecord,
    ) -> Result<EntitlementRecord, UpsertEntitlementError>;

    async fn set_entitlement_status(
        &self,
        user_id: &AccountID,
        status: EntitlementStatus,
        now: DateTime<Utc>,
    ) -> Result<EntitlementRecord, SetEntitlementStatusError>;

    /// Adds `amount` to one counter in a single atomic step and returns the
    /// counters after the update
    async fn increment_usage(
        &self,
        user_id: &AccountID,
        category: ResourceCategory,
        amount: u64,
        now: DateTime<Utc>,
    ) -> Result<UsageCounters, IncrementUsageError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Entitlement not found for user '{user_id}'")]
pub struct EntitlementNotFoundError {
    pub user_id: AccountID,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum GetEntitlementError {
    #[error(transparent)]
    NotFound(EntitlementNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for GetEntitlementError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum UpsertEntitlementError {
    #[error(transparent)]
    DuplicateWallet(EntitlementDuplicateWalletError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Wallet '{wallet_address}' already backs the entitlement of another user")]
pub struct EntitlementDuplicateWalletError {
    pub wallet_address: WalletAddress,
}

impl PartialEq for UpsertEntitlementError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DuplicateWallet(a), Self::DuplicateWallet(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SetEntitlementStatusError {
    #[error(transparent)]
    NotFound(EntitlementNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for SetEntitlementStatusError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum IncrementUsageError {
    #[error(transparent)]
    NotFound(EntitlementNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for IncrementUsageError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
