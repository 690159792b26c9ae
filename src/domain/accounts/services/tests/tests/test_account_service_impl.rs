// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use dill::{Catalog, CatalogBuilder};
use pretty_assertions::assert_eq;
use time_source::{SystemTimeSource, SystemTimeSourceStub};
use tollgate_accounts::*;
use tollgate_accounts_inmem::InMemoryAccountRepository;
use tollgate_accounts_services::AccountServiceImpl;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const WALLET: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";

#[test_log::test(tokio::test)]
async fn test_first_sight_creates_wallet_account() {
    let harness = AccountServiceHarness::new();
    let wallet = WalletAddressConvertor::parse(WALLET).unwrap();

    let account = harness
        .account_service
        .upsert_wallet_account(&wallet)
        .await
        .unwrap();

    assert_eq!(account.wallet_address, wallet);
    assert_eq!(account.provider, PROVIDER_WEB3_WALLET);
    assert_eq!(
        account.email,
        "0x9fe46736679d2d9a65f0992f2272de9f3c7fa6e0@wallet.invalid"
    );
    assert!(!account.email_verified);
    assert_eq!(account.registered_at, harness.time_source.now());

    let found = harness
        .account_service
        .account_by_id(&account.id)
        .await
        .unwrap();
    assert_eq!(found, Some(account));
}

#[test_log::test(tokio::test)]
async fn test_repeated_handshake_reuses_account() {
    let harness = AccountServiceHarness::new();
    let wallet = WalletAddressConvertor::parse(WALLET).unwrap();

    let first = harness
        .account_service
        .upsert_wallet_account(&wallet)
        .await
        .unwrap();

    harness.time_source.advance(Duration::hours(1));

    let second = harness
        .account_service
        .upsert_wallet_account(&wallet)
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.registered_at, first.registered_at);
    assert_eq!(second.updated_at, first.registered_at + Duration::hours(1));
}

#[test_log::test(tokio::test)]
async fn test_unknown_account_is_none() {
    let harness = AccountServiceHarness::new();

    let found = harness
        .account_service
        .account_by_id(&AccountID::try_new("no-such-account").unwrap())
        .await
        .unwrap();

    assert_eq!(found, None);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct AccountServiceHarness {
    account_service: Arc<dyn AccountService>,
    time_source: SystemTimeSourceStub,
}

impl AccountServiceHarness {
    fn new() -> Self {
        let time_source =
            SystemTimeSourceStub::new_set(Utc.with_ymd_and_hms(2050, 1, 1, 12, 0, 0).unwrap());

        let catalog: Catalog = {
            let mut b = CatalogBuilder::new();
            b.add::<AccountServiceImpl>();
            b.add::<InMemoryAccountRepository>();
            b.add_value(time_source.clone());
            b.bind::<dyn SystemTimeSource, SystemTimeSourceStub>();
            b.build()
        };

        Self {
            account_service: catalog.get_one().unwrap(),
            time_source,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
