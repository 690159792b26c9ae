// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;

use crate::{Account, AccountID, AccountService, WalletAddress};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

mockall::mock! {
    pub AccountService {}

    #[async_trait::async_trait]
    impl AccountService for AccountService {
        async fn account_by_id(&self, account_id: &AccountID) -> Result<Option<Account>, InternalError>;

        async fn upsert_wallet_account(&self, wallet: &WalletAddress) -> Result<Account, InternalError>;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl MockAccountService {
    pub fn with_account(account: Account) -> Self {
        let mut mock = Self::new();

        let expected_id = account.id.clone();
        let found = account.clone();
        mock.expect_account_by_id()
            .returning(move |id| Ok((*id == expected_id).then(|| found.clone())));

        mock.expect_upsert_wallet_account()
            .returning(move |_| Ok(account.clone()));

        mock
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
