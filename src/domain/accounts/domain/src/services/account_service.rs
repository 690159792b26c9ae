// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;

use crate::{Account, AccountID, WalletAddress};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    async fn account_by_id(&self, account_id: &AccountID) -> Result<Option<Account>, InternalError>;

    /// Returns the account bound to `wallet`, creating it on first sight
    async fn upsert_wallet_account(&self, wallet: &WalletAddress) -> Result<Account, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
