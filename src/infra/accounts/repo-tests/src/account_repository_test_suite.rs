// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use assert_matches::assert_matches;
use chrono::{Duration, SubsecRound, TimeZone, Utc};
use dill::Catalog;
use pretty_assertions::assert_eq;
use tollgate_accounts::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn wallet(last_byte: u8) -> WalletAddress {
    let mut bytes = [0x11u8; 20];
    bytes[19] = last_byte;
    WalletAddress::from(bytes)
}

fn new_account(id: &str, wallet: &WalletAddress) -> Account {
    let registered_at = Utc
        .with_ymd_and_hms(2050, 1, 1, 12, 0, 0)
        .unwrap()
        .round_subsecs(6);

    Account::new_wallet_account(AccountID::try_new(id).unwrap(), wallet, registered_at)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_missing_account_not_found(catalog: &Catalog) {
    let account_repo = catalog.get_one::<dyn AccountRepository>().unwrap();

    let missing_id = AccountID::try_new("acc-missing").unwrap();
    assert_matches!(
        account_repo.get_account_by_id(&missing_id).await,
        Err(GetAccountByIdError::NotFound(AccountNotFoundByIdError { account_id })) if account_id == missing_id
    );
    assert_matches!(
        account_repo.find_account_by_wallet(&wallet(1)).await,
        Ok(None)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_create_and_get_account(catalog: &Catalog) {
    let account_repo = catalog.get_one::<dyn AccountRepository>().unwrap();

    let account = new_account("acc-1", &wallet(1));
    account_repo.create_account(&account).await.unwrap();

    assert_eq!(
        account_repo.get_account_by_id(&account.id).await.unwrap(),
        account
    );
    assert_eq!(
        account_repo.find_account_by_wallet(&wallet(1)).await.unwrap(),
        Some(account)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_create_duplicate_account(catalog: &Catalog) {
    let account_repo = catalog.get_one::<dyn AccountRepository>().unwrap();

    let account = new_account("acc-1", &wallet(1));
    account_repo.create_account(&account).await.unwrap();

    assert_matches!(
        account_repo
            .create_account(&new_account("acc-1", &wallet(2)))
            .await,
        Err(CreateAccountError::Duplicate(CreateAccountErrorDuplicate {
            account_field: CreateAccountDuplicateField::Id
        }))
    );
    assert_matches!(
        account_repo
            .create_account(&new_account("acc-2", &wallet(1)))
            .await,
        Err(CreateAccountError::Duplicate(CreateAccountErrorDuplicate {
            account_field: CreateAccountDuplicateField::WalletAddress
        }))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_wallet_account(catalog: &Catalog) {
    let account_repo = catalog.get_one::<dyn AccountRepository>().unwrap();

    let first = new_account("acc-1", &wallet(1));
    let created = account_repo.upsert_wallet_account(&first).await.unwrap();
    assert_eq!(created, first);

    // Same wallet, different candidate ID: the stored account wins
    let mut second = new_account("acc-2", &wallet(1));
    second.updated_at = first.updated_at + Duration::hours(1);
    let upserted = account_repo.upsert_wallet_account(&second).await.unwrap();

    assert_eq!(upserted.id, first.id);
    assert_eq!(upserted.registered_at, first.registered_at);
    assert_eq!(upserted.updated_at, second.updated_at);

    let missing_id = AccountID::try_new("acc-2").unwrap();
    assert_matches!(
        account_repo.get_account_by_id(&missing_id).await,
        Err(GetAccountByIdError::NotFound(_))
    );

    // Another wallet gets its own account
    let other = account_repo
        .upsert_wallet_account(&new_account("acc-3", &wallet(3)))
        .await
        .unwrap();
    assert_eq!(other.id.as_ref(), "acc-3");
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
