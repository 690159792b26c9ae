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

use dill::*;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryAccountRepository {
    state: Arc<Mutex<State>>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    accounts_by_id: HashMap<AccountID, Account>,
    account_id_by_wallet: HashMap<WalletAddress, AccountID>,
}

impl State {
    fn insert(&mut self, account: Account) {
        self.account_id_by_wallet
            .insert(account.wallet_address, account.id.clone());
        self.accounts_by_id.insert(account.id.clone(), account);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[component(pub)]
#[interface(dyn AccountRepository)]
#[scope(Singleton)]
impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, account: &Account) -> Result<(), CreateAccountError> {
        let mut guard = self.state.lock().unwrap();

        if guard.accounts_by_id.contains_key(&account.id) {
            return Err(CreateAccountError::Duplicate(CreateAccountErrorDuplicate {
                account_field: CreateAccountDuplicateField::Id,
            }));
        }
        if guard
            .account_id_by_wallet
            .contains_key(&account.wallet_address)
        {
            return Err(CreateAccountError::Duplicate(CreateAccountErrorDuplicate {
                account_field: CreateAccountDuplicateField::WalletAddress,
            }));
        }

        guard.insert(account.clone());

        Ok(())
    }

    async fn get_account_by_id(
        &self,
        account_id: &AccountID,
    ) -> Result<Account, GetAccountByIdError> {
        let guard = self.state.lock().unwrap();

        guard.accounts_by_id.get(account_id).cloned().ok_or_else(|| {
            GetAccountByIdError::NotFound(AccountNotFoundByIdError {
                account_id: account_id.clone(),
            })
        })
    }

    async fn find_account_by_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<Account>, FindAccountByWalletError> {
        let guard = self.state.lock().unwrap();

        Ok(guard
            .account_id_by_wallet
            .get(wallet)
            .and_then(|account_id| guard.accounts_by_id.get(account_id))
            .cloned())
    }

    async fn upsert_wallet_account(
        &self,
        account: &Account,
    ) -> Result<Account, UpsertWalletAccountError> {
        let mut guard = self.state.lock().unwrap();

        let State {
            accounts_by_id,
            account_id_by_wallet,
        } = &mut *guard;

        let maybe_existing = match account_id_by_wallet.get(&account.wallet_address) {
            Some(existing_id) => accounts_by_id.get_mut(existing_id),
            None => None,
        };

        if let Some(existing) = maybe_existing {
            existing.updated_at = account.updated_at;
            return Ok(existing.clone());
        }

        guard.insert(account.clone());

        Ok(account.clone())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
