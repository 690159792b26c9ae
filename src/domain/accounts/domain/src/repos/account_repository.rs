// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use internal_error::InternalError;
use thiserror::Error;

use crate::{Account, AccountID, WalletAddress};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_account(&self, account: &Account) -> Result<(), CreateAccountError>;

    async fn get_account_by_id(&self, account_id: &AccountID)
    -> Result<Account, GetAccountByIdError>;

    async fn find_account_by_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<Account>, FindAccountByWalletError>;

    /// Inserts `account` unless an account with the same wallet exists, in
    /// which case the stored one is touched (`updated_at`) and returned.
    /// Atomic with respect to concurrent upserts of the same wallet.
    async fn upsert_wallet_account(
        &self,
        account: &Account,
    ) -> Result<Account, UpsertWalletAccountError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CreateAccountError {
    #[error(transparent)]
    Duplicate(CreateAccountErrorDuplicate),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug)]
#[error("Account not created, duplicate {account_field}")]
pub struct CreateAccountErrorDuplicate {
    pub account_field: CreateAccountDuplicateField,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CreateAccountDuplicateField {
    Id,
    WalletAddress,
}

impl Display for CreateAccountDuplicateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Id => "id",
                Self::WalletAddress => "wallet address",
            },
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum GetAccountByIdError {
    #[error(transparent)]
    NotFound(AccountNotFoundByIdError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug)]
#[error("Account not found by ID: '{account_id}'")]
pub struct AccountNotFoundByIdError {
    pub account_id: AccountID,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum FindAccountByWalletError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum UpsertWalletAccountError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
