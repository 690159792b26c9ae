// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, SubsecRound, TimeZone, Utc};
use dill::Catalog;
use pretty_assertions::assert_eq;
use tollgate_accounts::{AccountID, WalletAddress};
use tollgate_entitlements::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn wallet(last_byte: u8) -> WalletAddress {
    let mut bytes = [0x22u8; 20];
    bytes[19] = last_byte;
    WalletAddress::from(bytes)
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 1, 12, 0, 0)
        .unwrap()
        .round_subsecs(6)
}

fn verified_record(user_id: &str, wallet: &WalletAddress, tier: Tier) -> EntitlementRecord {
    EntitlementRecord {
        user_id: AccountID::try_new(user_id).unwrap(),
        wallet_address: *wallet,
        token_id: Some(TokenId::from(7u64)),
        tier,
        status: EntitlementStatus::Verified,
        usage: UsageCounters::default(),
        created_at: t0(),
        updated_at: t0(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_missing_entitlement_not_found(catalog: &Catalog) {
    let entitlement_repo = catalog.get_one::<dyn EntitlementRepository>().unwrap();

    let missing = AccountID::try_new("acc-missing").unwrap();
    assert_matches!(
        entitlement_repo.get_entitlement_by_user_id(&missing).await,
        Err(GetEntitlementError::NotFound(EntitlementNotFoundError { user_id })) if user_id == missing
    );
    assert_matches!(
        entitlement_repo
            .set_entitlement_status(&missing, EntitlementStatus::Revoked, t0())
            .await,
        Err(SetEntitlementStatusError::NotFound(_))
    );
    assert_matches!(
        entitlement_repo
            .increment_usage(&missing, ResourceCategory::Workflows, 1, t0())
            .await,
        Err(IncrementUsageError::NotFound(_))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_and_get_entitlement(catalog: &Catalog) {
    let entitlement_repo = catalog.get_one::<dyn EntitlementRepository>().unwrap();

    let record = verified_record("acc-1", &wallet(1), Tier::Premium);
    let stored = entitlement_repo.upsert_entitlement(&record).await.unwrap();
    assert_eq!(stored, record);

    assert_eq!(
        entitlement_repo
            .get_entitlement_by_user_id(&record.user_id)
            .await
            .unwrap(),
        record
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_preserves_usage_and_creation_time(catalog: &Catalog) {
    let entitlement_repo = catalog.get_one::<dyn EntitlementRepository>().unwrap();

    let record = verified_record("acc-1", &wallet(1), Tier::Standard);
    entitlement_repo.upsert_entitlement(&record).await.unwrap();
    entitlement_repo
        .increment_usage(&record.user_id, ResourceCategory::Workflows, 3, t0())
        .await
        .unwrap();

    let later = t0() + Duration::hours(2);
    let refreshed = EntitlementRecord {
        wallet_address: wallet(2),
        token_id: Some(TokenId::from(8u64)),
        tier: Tier::Enterprise,
        usage: UsageCounters::default(),
        created_at: later,
        updated_at: later,
        ..record.clone()
    };
    let stored = entitlement_repo
        .upsert_entitlement(&refreshed)
        .await
        .unwrap();

    assert_eq!(
        stored,
        EntitlementRecord {
            usage: UsageCounters {
                workflows: 3,
                ..UsageCounters::default()
            },
            created_at: t0(),
            ..refreshed
        }
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_duplicate_wallet(catalog: &Catalog) {
    let entitlement_repo = catalog.get_one::<dyn EntitlementRepository>().unwrap();

    entitlement_repo
        .upsert_entitlement(&verified_record("acc-1", &wallet(1), Tier::Standard))
        .await
        .unwrap();

    assert_matches!(
        entitlement_repo
            .upsert_entitlement(&verified_record("acc-2", &wallet(1), Tier::Standard))
            .await,
        Err(UpsertEntitlementError::DuplicateWallet(EntitlementDuplicateWalletError { wallet_address }))
            if wallet_address == wallet(1)
    );

    // The wallet is released once its holder moves to another one
    entitlement_repo
        .upsert_entitlement(&verified_record("acc-1", &wallet(3), Tier::Standard))
        .await
        .unwrap();
    entitlement_repo
        .upsert_entitlement(&verified_record("acc-2", &wallet(1), Tier::Standard))
        .await
        .unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_set_entitlement_status(catalog: &Catalog) {
    let entitlement_repo = catalog.get_one::<dyn EntitlementRepository>().unwrap();

    let record = verified_record("acc-1", &wallet(1), Tier::Premium);
    entitlement_repo.upsert_entitlement(&record).await.unwrap();

    let later = t0() + Duration::minutes(5);
    let revoked = entitlement_repo
        .set_entitlement_status(&record.user_id, EntitlementStatus::Revoked, later)
        .await
        .unwrap();

    assert_eq!(
        revoked,
        EntitlementRecord {
            status: EntitlementStatus::Revoked,
            updated_at: later,
            ..record.clone()
        }
    );
    assert_eq!(
        entitlement_repo
            .get_entitlement_by_user_id(&record.user_id)
            .await
            .unwrap(),
        revoked
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_upsert_keeps_revoked_status(catalog: &Catalog) {
    let entitlement_repo = catalog.get_one::<dyn EntitlementRepository>().unwrap();

    let record = verified_record("acc-1", &wallet(1), Tier::Standard);
    entitlement_repo.upsert_entitlement(&record).await.unwrap();
    entitlement_repo
        .set_entitlement_status(&record.user_id, EntitlementStatus::Revoked, t0())
        .await
        .unwrap();

    let later = t0() + Duration::hours(1);
    let stored = entitlement_repo
        .upsert_entitlement(&EntitlementRecord {
            tier: Tier::Premium,
            updated_at: later,
            ..record.clone()
        })
        .await
        .unwrap();

    assert_eq!(
        stored,
        EntitlementRecord {
            tier: Tier::Premium,
            status: EntitlementStatus::Revoked,
            updated_at: later,
            ..record
        }
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_increment_usage(catalog: &Catalog) {
    let entitlement_repo = catalog.get_one::<dyn EntitlementRepository>().unwrap();

    let record = verified_record("acc-1", &wallet(1), Tier::Standard);
    entitlement_repo.upsert_entitlement(&record).await.unwrap();

    entitlement_repo
        .increment_usage(&record.user_id, ResourceCategory::MonthlyExecutions, 5, t0())
        .await
        .unwrap();
    let usage = entitlement_repo
        .increment_usage(&record.user_id, ResourceCategory::KnowledgeBases, 1, t0())
        .await
        .unwrap();

    assert_eq!(
        usage,
        UsageCounters {
            workflows: 0,
            monthly_executions: 5,
            knowledge_bases: 1,
            collaborator_seats: 0,
        }
    );
    assert_eq!(
        entitlement_repo
            .get_entitlement_by_user_id(&record.user_id)
            .await
            .unwrap()
            .usage,
        usage
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_concurrent_usage_increments_are_not_lost(catalog: &Catalog) {
    let entitlement_repo = catalog.get_one::<dyn EntitlementRepository>().unwrap();

    let record = verified_record("acc-1", &wallet(1), Tier::Enterprise);
    entitlement_repo.upsert_entitlement(&record).await.unwrap();

    let increments = (0..10).map(|_| {
        entitlement_repo.increment_usage(&record.user_id, ResourceCategory::Workflows, 1, t0())
    });
    for result in futures::future::join_all(increments).await {
        result.unwrap();
    }

    assert_eq!(
        entitlement_repo
            .get_entitlement_by_user_id(&record.user_id)
            .await
            .unwrap()
            .usage
            .workflows,
        10
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
