// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;
use tollgate_accounts::{AccountID, WalletAddress};

use crate::{EntitlementDuplicateWalletError, EntitlementRecord, ResolveEntitlementError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait EntitlementSyncService: Send + Sync {
    /// Re-verifies ownership on chain and persists the outcome.
    ///
    /// An owning wallet gets a `verified` record with its tier. A wallet that
    /// no longer owns a token moves an existing record to `expired`; no
    /// record is created for it. Returns the stored record, if any.
    async fn sync(
        &self,
        user_id: &AccountID,
        wallet: &WalletAddress,
    ) -> Result<Option<EntitlementRecord>, SyncEntitlementError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SyncEntitlementError {
    #[error(transparent)]
    Resolve(#[from] ResolveEntitlementError),

    #[error(transparent)]
    WalletConflict(EntitlementDuplicateWalletError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
