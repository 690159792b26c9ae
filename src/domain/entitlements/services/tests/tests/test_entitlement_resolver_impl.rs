// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use dill::{Catalog, CatalogBuilder};
use pretty_assertions::assert_eq;
use time_source::{SystemTimeSource, SystemTimeSourceStub};
use tollgate_accounts::{WalletAddress, WalletAddressConvertor};
use tollgate_entitlements::testing::FakeNftContract;
use tollgate_entitlements::*;
use tollgate_entitlements_services::EntitlementResolverImpl;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const HOLDER: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";
const OTHER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

fn holder() -> WalletAddress {
    WalletAddressConvertor::parse(HOLDER).unwrap()
}

fn other() -> WalletAddress {
    WalletAddressConvertor::parse(OTHER).unwrap()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_zero_balance_is_not_owned() {
    let harness = ResolverHarness::new(FakeNftContract::new(), |_| {});

    let resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();

    assert_eq!(resolution, OwnershipResolution::not_owned(holder(), 0));
    assert_eq!(harness.contract.calls(), vec!["balanceOf"]);
}

#[test_log::test(tokio::test)]
async fn test_enumerated_token_is_confirmed_with_owner_of() {
    let contract = FakeNftContract::new();
    contract.mint(holder(), 3);
    let harness = ResolverHarness::new(contract, |_| {});

    let resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();

    assert_eq!(
        resolution,
        OwnershipResolution {
            wallet_address: holder(),
            owns: true,
            token_id: Some(TokenId::from(3u64)),
            tier: Tier::Standard,
            owned_count: 1,
            is_owner: true,
            metadata: None,
        }
    );
    assert_eq!(
        harness.contract.calls(),
        vec!["balanceOf", "tokenOfOwnerByIndex", "ownerOf"]
    );
}

#[test_log::test(tokio::test)]
async fn test_tier_follows_token_id_ranges() {
    let contract = FakeNftContract::new();
    contract.mint(holder(), 7).mint(other(), 4);
    let harness = ResolverHarness::new(contract, |config| {
        config.premium_token_ids = TokenIdAllowList::from_str("1-5").unwrap();
        config.enterprise_token_ids = TokenIdAllowList::from_str("6-10").unwrap();
    });

    let holder_resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();
    assert!(holder_resolution.owns);
    assert_eq!(holder_resolution.tier, Tier::Enterprise);
    assert_eq!(holder_resolution.token_id, Some(TokenId::from(7u64)));

    let other_resolution = harness
        .resolver
        .resolve(&other(), ResolveMode::Fresh)
        .await
        .unwrap();
    assert!(other_resolution.owns);
    assert_eq!(other_resolution.tier, Tier::Premium);
}

#[test_log::test(tokio::test)]
async fn test_fallback_token_checked_without_enumeration() {
    let contract = FakeNftContract::without_enumeration();
    contract.mint(holder(), 1);
    let harness = ResolverHarness::new(contract, |config| {
        config.fallback_token_id = Some(TokenId::from(1u64));
    });

    let resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();

    assert!(resolution.owns);
    assert!(resolution.is_owner);
    assert_eq!(resolution.token_id, Some(TokenId::from(1u64)));
    assert_eq!(resolution.tier, Tier::Standard);
    assert_eq!(
        harness.contract.calls(),
        vec!["balanceOf", "tokenOfOwnerByIndex", "ownerOf"]
    );
}

#[test_log::test(tokio::test)]
async fn test_fallback_token_held_by_someone_else() {
    let contract = FakeNftContract::without_enumeration();
    contract.mint(other(), 1).mint(holder(), 2);
    let harness = ResolverHarness::new(contract, |config| {
        config.fallback_token_id = Some(TokenId::from(1u64));
    });

    let resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();

    assert_eq!(resolution, OwnershipResolution::not_owned(holder(), 1));
}

#[test_log::test(tokio::test)]
async fn test_no_enumeration_and_no_fallback_is_not_owned() {
    let contract = FakeNftContract::without_enumeration();
    contract.mint(holder(), 1);
    let harness = ResolverHarness::new(contract, |_| {});

    let resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();

    assert_eq!(resolution, OwnershipResolution::not_owned(holder(), 1));
    assert_eq!(
        harness.contract.calls(),
        vec!["balanceOf", "tokenOfOwnerByIndex"]
    );
}

#[test_log::test(tokio::test)]
async fn test_balance_without_findable_token_is_not_owned() {
    let contract = FakeNftContract::new();
    contract.override_balance(holder(), 2);
    let harness = ResolverHarness::new(contract, |_| {});

    let resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();

    assert!(!resolution.owns);
    assert_eq!(resolution.owned_count, 2);
    assert_eq!(resolution.tier, Tier::None);
}

#[test_log::test(tokio::test)]
async fn test_transient_failures_exhaust_attempts() {
    let contract = FakeNftContract::new();
    contract.mint(holder(), 3).fail_next(
        2,
        ChainReadError::Timeout {
            method: "balanceOf",
        },
    );
    let harness = ResolverHarness::new(contract, |_| {});

    let result = harness.resolve(ResolveMode::Fresh).await;

    assert_matches!(
        result,
        Err(ResolveEntitlementError::VerificationFailed(VerificationFailedError {
            attempts: 2,
            last_error: ChainReadError::Timeout { method: "balanceOf" },
        }))
    );
    assert_eq!(
        harness.time_source.recorded_sleeps(),
        vec![Duration::milliseconds(250)]
    );
    assert_eq!(harness.contract.calls(), vec!["balanceOf", "balanceOf"]);
}

#[test_log::test(tokio::test)]
async fn test_transient_failure_recovers_on_retry() {
    let contract = FakeNftContract::new();
    contract.mint(holder(), 3).fail_next(
        1,
        ChainReadError::Transport {
            method: "balanceOf",
            reason: "connection reset".to_string(),
        },
    );
    let harness = ResolverHarness::new(contract, |_| {});

    let resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();

    assert!(resolution.owns);
    assert_eq!(harness.time_source.recorded_sleeps().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_revert_is_not_retried() {
    let contract = FakeNftContract::new();
    contract.fail_next(
        1,
        ChainReadError::Reverted {
            method: "balanceOf",
        },
    );
    let harness = ResolverHarness::new(contract, |_| {});

    let result = harness.resolve(ResolveMode::Fresh).await;

    assert_matches!(
        result,
        Err(ResolveEntitlementError::VerificationFailed(VerificationFailedError {
            attempts: 1,
            ..
        }))
    );
    assert!(harness.time_source.recorded_sleeps().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_cached_resolution_only_served_when_allowed() {
    let contract = FakeNftContract::new();
    contract.mint(holder(), 3);
    let harness = ResolverHarness::new(contract, |_| {});

    assert!(harness.resolve(ResolveMode::Fresh).await.unwrap().owns);

    harness.contract.transfer(3, other());

    assert!(harness.resolve(ResolveMode::AllowCached).await.unwrap().owns);
    assert!(!harness.resolve(ResolveMode::Fresh).await.unwrap().owns);
    // Fresh reads refresh the cache
    assert!(!harness.resolve(ResolveMode::AllowCached).await.unwrap().owns);
}

#[test_log::test(tokio::test)]
async fn test_cached_resolution_expires() {
    let contract = FakeNftContract::new();
    contract.mint(holder(), 3);
    let harness = ResolverHarness::new(contract, |_| {});

    assert!(harness.resolve(ResolveMode::AllowCached).await.unwrap().owns);

    harness.contract.transfer(3, other());
    harness.time_source.advance(Duration::seconds(59));
    assert!(harness.resolve(ResolveMode::AllowCached).await.unwrap().owns);

    harness.time_source.advance(Duration::seconds(1));
    assert!(!harness.resolve(ResolveMode::AllowCached).await.unwrap().owns);
}

#[test_log::test(tokio::test)]
async fn test_missing_contract_fails_closed() {
    let contract = FakeNftContract::new();
    contract.mint(holder(), 3);
    let harness = ResolverHarness::new(contract, |config| {
        config.contract_address = None;
    });

    assert_matches!(
        harness.resolve(ResolveMode::Fresh).await,
        Err(ResolveEntitlementError::Configuration(_))
    );
    assert!(harness.contract.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_metadata_fetched_when_enabled() {
    let contract = FakeNftContract::new();
    contract
        .mint(holder(), 3)
        .set_token_uri(3, "ipfs://bafy/3.json")
        .mint(other(), 4);
    let harness = ResolverHarness::new(contract, |config| {
        config.fetch_metadata = true;
    });

    let resolution = harness.resolve(ResolveMode::Fresh).await.unwrap();
    assert_eq!(
        resolution.metadata,
        Some(TokenMetadata {
            token_uri: "ipfs://bafy/3.json".to_string(),
        })
    );

    // Metadata is best effort
    let other_resolution = harness
        .resolver
        .resolve(&other(), ResolveMode::Fresh)
        .await
        .unwrap();
    assert!(other_resolution.owns);
    assert_eq!(other_resolution.metadata, None);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Harness
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct ResolverHarness {
    _catalog: Catalog,
    resolver: Arc<dyn EntitlementResolver>,
    contract: FakeNftContract,
    time_source: SystemTimeSourceStub,
}

impl ResolverHarness {
    fn new(contract: FakeNftContract, customize: impl FnOnce(&mut EntitlementsConfig)) -> Self {
        let mut config = EntitlementsConfig {
            contract_address: Some(WalletAddressConvertor::parse(CONTRACT).unwrap()),
            ..EntitlementsConfig::default()
        };
        customize(&mut config);

        let time_source =
            SystemTimeSourceStub::new_set(Utc.with_ymd_and_hms(2050, 1, 1, 12, 0, 0).unwrap());

        let mut b = CatalogBuilder::new();
        b.add::<EntitlementResolverImpl>()
            .add_value(config)
            .add_value(contract.clone())
            .bind::<dyn NftContractReader, FakeNftContract>()
            .add_value(time_source.clone())
            .bind::<dyn SystemTimeSource, SystemTimeSourceStub>();

        let catalog = b.build();

        Self {
            resolver: catalog.get_one().unwrap(),
            _catalog: catalog,
            contract,
            time_source,
        }
    }

    async fn resolve(
        &self,
        mode: ResolveMode,
    ) -> Result<OwnershipResolution, ResolveEntitlementError> {
        self.resolver.resolve(&holder(), mode).await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
