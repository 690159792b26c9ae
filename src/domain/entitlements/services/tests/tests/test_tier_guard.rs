// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{DateTime, TimeZone, Utc};
use dill::CatalogBuilder;
use internal_error::InternalError;
use pretty_assertions::assert_eq;
use time_source::{SystemTimeSource, SystemTimeSourceStub};
use tollgate_accounts::testing::federated_session;
use tollgate_accounts::{
    AccountID,
    AnonymousSessionReason,
    CurrentSession,
    WalletAddress,
    WalletAddressConvertor,
};
use tollgate_entitlements::testing::MockEntitlementResolver;
use tollgate_entitlements::*;
use tollgate_entitlements_inmem::InMemoryEntitlementRepository;
use tollgate_entitlements_services::TierGuard;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const USER_ID: &str = "acc-1";
const WALLET: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";

fn wallet() -> WalletAddress {
    WalletAddressConvertor::parse(WALLET).unwrap()
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 1, 12, 0, 0).unwrap()
}

type OpResult = Result<Tier, GuardedError<&'static str>>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_anonymous_caller_is_unauthorized() {
    let harness = TierGuardHarness::builder()
        .session(CurrentSession::anonymous(
            AnonymousSessionReason::NoAuthenticationProvided,
        ))
        .build();

    let mut ran = false;
    let result: OpResult = harness
        .guard
        .run(&GuardRequirements::new(), |record| {
            ran = true;
            async move { Ok(record.tier) }
        })
        .await;

    assert_matches!(result, Err(GuardedError::Denied(denied)) if denied.is_unauthorized());
    assert!(!ran);
}

#[test_log::test(tokio::test)]
async fn test_caller_without_entitlement_is_denied() {
    let harness = TierGuardHarness::builder().build();

    let result: OpResult = harness
        .guard
        .run(&GuardRequirements::new(), |record| async move {
            Ok(record.tier)
        })
        .await;

    assert_matches!(
        result,
        Err(GuardedError::Denied(GuardDenied::EntitlementNotFound))
    );
}

#[test_log::test(tokio::test)]
async fn test_unverified_entitlement_is_denied() {
    let harness = TierGuardHarness::builder().build();
    harness
        .seed(Tier::Premium, EntitlementStatus::Expired, UsageCounters::default())
        .await;

    let result: OpResult = harness
        .guard
        .run(&GuardRequirements::new(), |record| async move {
            Ok(record.tier)
        })
        .await;

    assert_matches!(
        result,
        Err(GuardedError::Denied(GuardDenied::EntitlementNotVerified {
            status: EntitlementStatus::Expired
        }))
    );
}

#[test_log::test(tokio::test)]
async fn test_revoked_entitlement_is_denied_without_running() {
    let harness = TierGuardHarness::builder().build();
    harness
        .seed(Tier::Enterprise, EntitlementStatus::Revoked, UsageCounters::default())
        .await;

    let mut ran = false;
    let result: OpResult = harness
        .guard
        .run(&GuardRequirements::new(), |record| {
            ran = true;
            async move { Ok(record.tier) }
        })
        .await;

    assert_matches!(
        result,
        Err(GuardedError::Denied(GuardDenied::EntitlementNotVerified {
            status: EntitlementStatus::Revoked
        }))
    );
    assert!(!ran);
}

#[test_log::test(tokio::test)]
async fn test_tier_requirement() {
    let harness = TierGuardHarness::builder().build();
    harness
        .seed(Tier::Standard, EntitlementStatus::Verified, UsageCounters::default())
        .await;

    let result: OpResult = harness
        .guard
        .run(
            &GuardRequirements::new().require_tier(Tier::Premium),
            |record| async move { Ok(record.tier) },
        )
        .await;
    assert_matches!(
        result,
        Err(GuardedError::Denied(GuardDenied::InsufficientTier {
            actual: Tier::Standard,
            required,
        })) if required == vec![Tier::Premium]
    );

    let result: OpResult = harness
        .guard
        .run(
            &GuardRequirements::new().require_tier(Tier::Standard),
            |record| async move { Ok(record.tier) },
        )
        .await;
    assert_eq!(result.unwrap(), Tier::Standard);
}

#[test_log::test(tokio::test)]
async fn test_limit_reached_is_denied_without_running() {
    let harness = TierGuardHarness::builder().build();
    harness
        .seed(
            Tier::Standard,
            EntitlementStatus::Verified,
            UsageCounters {
                workflows: 10,
                ..UsageCounters::default()
            },
        )
        .await;

    let mut ran = false;
    let result: OpResult = harness
        .guard
        .run(&create_workflow_requirements(), |record| {
            ran = true;
            async move { Ok(record.tier) }
        })
        .await;

    assert_matches!(
        result,
        Err(GuardedError::Denied(GuardDenied::ResourceLimitExceeded {
            category: ResourceCategory::Workflows,
            limit: 10,
            usage: 10,
        }))
    );
    assert!(!ran);
    assert_eq!(harness.usage().await.workflows, 10);
}

#[test_log::test(tokio::test)]
async fn test_usage_charged_after_success() {
    let harness = TierGuardHarness::builder().build();
    harness
        .seed(
            Tier::Standard,
            EntitlementStatus::Verified,
            UsageCounters {
                workflows: 9,
                ..UsageCounters::default()
            },
        )
        .await;

    let result: OpResult = harness
        .guard
        .run(&create_workflow_requirements(), |record| async move {
            // Not charged yet while the operation runs
            assert_eq!(record.usage.workflows, 9);
            Ok(record.tier)
        })
        .await;

    assert_eq!(result.unwrap(), Tier::Standard);
    assert_eq!(harness.usage().await.workflows, 10);

    let result: OpResult = harness
        .guard
        .run(&create_workflow_requirements(), |record| async move {
            Ok(record.tier)
        })
        .await;
    assert_matches!(
        result,
        Err(GuardedError::Denied(GuardDenied::ResourceLimitExceeded { .. }))
    );
}

#[test_log::test(tokio::test)]
async fn test_failed_operation_is_not_charged() {
    let harness = TierGuardHarness::builder().build();
    harness
        .seed(Tier::Standard, EntitlementStatus::Verified, UsageCounters::default())
        .await;

    let result: OpResult = harness
        .guard
        .run(&create_workflow_requirements(), |_| async move {
            Err("workflow store unavailable")
        })
        .await;

    assert_matches!(
        result,
        Err(GuardedError::Operation("workflow store unavailable"))
    );
    assert_eq!(harness.usage().await, UsageCounters::default());
}

#[test_log::test(tokio::test)]
async fn test_failed_charge_keeps_operation_result() {
    let harness = TierGuardHarness::builder().failing_usage_charges().build();
    harness
        .seed(Tier::Standard, EntitlementStatus::Verified, UsageCounters::default())
        .await;

    let result: OpResult = harness
        .guard
        .run(&create_workflow_requirements(), |record| async move {
            Ok(record.tier)
        })
        .await;

    assert_eq!(result.unwrap(), Tier::Standard);
    assert_eq!(harness.usage().await.workflows, 0);
}

#[test_log::test(tokio::test)]
async fn test_ownership_recheck_denies_lost_token() {
    let mut resolver = MockEntitlementResolver::new();
    resolver
        .expect_resolve()
        .withf(|wallet, mode| *wallet == self::wallet() && *mode == ResolveMode::AllowCached)
        .times(1)
        .returning(|wallet, _| Ok(OwnershipResolution::not_owned(*wallet, 0)));

    let harness = TierGuardHarness::builder()
        .recheck_ownership(resolver)
        .build();
    harness
        .seed(Tier::Premium, EntitlementStatus::Verified, UsageCounters::default())
        .await;

    let result: OpResult = harness
        .guard
        .run(&GuardRequirements::new(), |record| async move {
            Ok(record.tier)
        })
        .await;

    assert_matches!(result, Err(GuardedError::Denied(GuardDenied::OwnershipLost)));
}

#[test_log::test(tokio::test)]
async fn test_ownership_recheck_failure_denies_without_running() {
    let mut resolver = MockEntitlementResolver::new();
    resolver.expect_resolve().times(1).returning(|_, _| {
        Err(ResolveEntitlementError::VerificationFailed(
            VerificationFailedError {
                attempts: 2,
                last_error: ChainReadError::Timeout {
                    method: "balanceOf",
                },
            },
        ))
    });

    let harness = TierGuardHarness::builder()
        .recheck_ownership(resolver)
        .build();
    harness
        .seed(Tier::Premium, EntitlementStatus::Verified, UsageCounters::default())
        .await;

    let mut ran = false;
    let result: OpResult = harness
        .guard
        .run(&create_workflow_requirements(), |record| {
            ran = true;
            async move { Ok(record.tier) }
        })
        .await;

    assert_matches!(
        result,
        Err(GuardedError::Denied(GuardDenied::VerificationFailed))
    );
    assert!(!ran);
    assert_eq!(harness.usage().await, UsageCounters::default());
}

#[test_log::test(tokio::test)]
async fn test_ownership_recheck_passes_for_holder() {
    let mut resolver = MockEntitlementResolver::new();
    resolver.expect_resolve().times(1).returning(|wallet, _| {
        Ok(OwnershipResolution {
            wallet_address: *wallet,
            owns: true,
            token_id: Some(TokenId::from(3u64)),
            tier: Tier::Premium,
            owned_count: 1,
            is_owner: true,
            metadata: None,
        })
    });

    let harness = TierGuardHarness::builder()
        .recheck_ownership(resolver)
        .build();
    harness
        .seed(Tier::Premium, EntitlementStatus::Verified, UsageCounters::default())
        .await;

    let result: OpResult = harness
        .guard
        .run(
            &GuardRequirements::new().require_tier(Tier::Premium),
            |record| async move { Ok(record.tier) },
        )
        .await;

    assert_eq!(result.unwrap(), Tier::Premium);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Harness
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn create_workflow_requirements() -> GuardRequirements {
    GuardRequirements::new()
        .check_resource(ResourceCategory::Workflows)
        .increment_usage(ResourceCategory::Workflows, 1)
}

struct TierGuardHarness {
    guard: Arc<TierGuard>,
    entitlement_repo: Arc<dyn EntitlementRepository>,
    time_source: SystemTimeSourceStub,
}

struct TierGuardHarnessBuilder {
    session: CurrentSession,
    resolver: MockEntitlementResolver,
    recheck_ownership: bool,
    failing_usage_charges: bool,
}

impl TierGuardHarnessBuilder {
    fn session(mut self, session: CurrentSession) -> Self {
        self.session = session;
        self
    }

    fn recheck_ownership(mut self, resolver: MockEntitlementResolver) -> Self {
        self.resolver = resolver;
        self.recheck_ownership = true;
        self
    }

    fn failing_usage_charges(mut self) -> Self {
        self.failing_usage_charges = true;
        self
    }

    fn build(self) -> TierGuardHarness {
        let time_source = SystemTimeSourceStub::new_set(t0());

        let mut b = CatalogBuilder::new();
        if self.failing_usage_charges {
            b.add_value(FailingUsageEntitlementRepository {
                inner: InMemoryEntitlementRepository::new(),
            })
            .bind::<dyn EntitlementRepository, FailingUsageEntitlementRepository>();
        } else {
            b.add::<InMemoryEntitlementRepository>();
        }

        b.add::<TierGuard>()
            .add_value(self.session)
            .add_value(self.resolver)
            .bind::<dyn EntitlementResolver, MockEntitlementResolver>()
            .add_value(TierGuardConfig {
                recheck_ownership: self.recheck_ownership,
            })
            .add_value(time_source.clone())
            .bind::<dyn SystemTimeSource, SystemTimeSourceStub>();

        let catalog = b.build();

        TierGuardHarness {
            guard: catalog.get_one().unwrap(),
            entitlement_repo: catalog.get_one().unwrap(),
            time_source,
        }
    }
}

impl TierGuardHarness {
    /// Signed-in caller, no ownership recheck
    fn builder() -> TierGuardHarnessBuilder {
        TierGuardHarnessBuilder {
            session: CurrentSession::authenticated(federated_session(USER_ID, t0())),
            resolver: MockEntitlementResolver::new(),
            recheck_ownership: false,
            failing_usage_charges: false,
        }
    }

    async fn seed(&self, tier: Tier, status: EntitlementStatus, usage: UsageCounters) {
        let now = self.time_source.now();

        self.entitlement_repo
            .upsert_entitlement(&EntitlementRecord {
                user_id: AccountID::try_new(USER_ID).unwrap(),
                wallet_address: wallet(),
                token_id: Some(TokenId::from(3u64)),
                tier,
                status,
                usage,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    async fn usage(&self) -> UsageCounters {
        self.entitlement_repo
            .get_entitlement_by_user_id(&AccountID::try_new(USER_ID).unwrap())
            .await
            .unwrap()
            .usage
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Store whose usage counters cannot be written
struct FailingUsageEntitlementRepository {
    inner: InMemoryEntitlementRepository,
}

#[async_trait::async_trait]
impl EntitlementRepository for FailingUsageEntitlementRepository {
    async fn get_entitlement_by_user_id(
        &self,
        user_id: &AccountID,
    ) -> Result<EntitlementRecord, GetEntitlementError> {
        self.inner.get_entitlement_by_user_id(user_id).await
    }

    async fn upsert_entitlement(
        &self,
        record: &EntitlementRecord,
    ) -> Result<EntitlementRecord, UpsertEntitlementError> {
        self.inner.upsert_entitlement(record).await
    }

    async fn set_entitlement_status(
        &self,
        user_id: &AccountID,
        status: EntitlementStatus,
        now: DateTime<Utc>,
    ) -> Result<EntitlementRecord, SetEntitlementStatusError> {
        self.inner.set_entitlement_status(user_id, status, now).await
    }

    async fn increment_usage(
        &self,
        _user_id: &AccountID,
        _category: ResourceCategory,
        _amount: u64,
        _now: DateTime<Utc>,
    ) -> Result<UsageCounters, IncrementUsageError> {
        Err(IncrementUsageError::Internal(InternalError::new(
            "store is read-only",
        )))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
