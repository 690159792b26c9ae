// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use dill::*;
use internal_error::{InternalError, ResultIntoInternal};
use time_source::SystemTimeSource;
use tollgate_accounts::{
    Account,
    AccountID,
    AccountRepository,
    AccountService,
    GetAccountByIdError,
    WalletAddress,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct AccountServiceImpl {
    account_repo: Arc<dyn AccountRepository>,
    time_source: Arc<dyn SystemTimeSource>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[component(pub)]
#[interface(dyn AccountService)]
impl AccountServiceImpl {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            account_repo,
            time_source,
        }
    }
}

#[async_trait::async_trait]
impl AccountService for AccountServiceImpl {
    async fn account_by_id(&self, account_id: &AccountID) -> Result<Option<Account>, InternalError> {
        match self.account_repo.get_account_by_id(account_id).await {
            Ok(account) => Ok(Some(account)),
            Err(GetAccountByIdError::NotFound(_)) => Ok(None),
            Err(GetAccountByIdError::Internal(e)) => Err(e),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%wallet))]
    async fn upsert_wallet_account(&self, wallet: &WalletAddress) -> Result<Account, InternalError> {
        let candidate =
            Account::new_wallet_account(AccountID::new_generated(), wallet, self.time_source.now());

        let account = self
            .account_repo
            .upsert_wallet_account(&candidate)
            .await
            .int_err()?;

        if account.id == candidate.id {
            tracing::info!(account_id = %account.id, "Registered new wallet account");
        }

        Ok(account)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
