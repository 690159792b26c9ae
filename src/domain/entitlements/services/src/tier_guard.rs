// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::future::Future;
use std::sync::Arc;

use internal_error::ErrorIntoInternal;
use time_source::SystemTimeSource;
use tollgate_accounts::{AccountID, CurrentSession};
use tollgate_entitlements::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Runs operations on behalf of the current caller once their entitlement
/// satisfies the given requirements.
///
/// Resolved from a request-scoped catalog that carries [`CurrentSession`].
pub struct TierGuard {
    current_session: Arc<CurrentSession>,
    entitlement_repo: Arc<dyn EntitlementRepository>,
    resolver: Arc<dyn EntitlementResolver>,
    config: Arc<TierGuardConfig>,
    time_source: Arc<dyn SystemTimeSource>,
}

#[dill::component(pub)]
impl TierGuard {
    pub fn new(
        current_session: Arc<CurrentSession>,
        entitlement_repo: Arc<dyn EntitlementRepository>,
        resolver: Arc<dyn EntitlementResolver>,
        config: Arc<TierGuardConfig>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            current_session,
            entitlement_repo,
            resolver,
            config,
            time_source,
        }
    }

    /// Usage is charged only after `operation` succeeds; a failed operation
    /// never consumes quota. A charge that fails after success is logged and
    /// the operation's value is still returned.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn run<T, E, F, Fut>(
        &self,
        requirements: &GuardRequirements,
        operation: F,
    ) -> Result<T, GuardedError<E>>
    where
        F: FnOnce(EntitlementRecord) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let record = match self.authorize(requirements).await {
            Ok(record) => record,
            Err(GuardedError::Denied(denied)) => {
                tracing::info!(reason = ?denied, "Guarded operation denied");
                return Err(GuardedError::Denied(denied));
            }
            Err(err) => return Err(err),
        };

        let user_id = record.user_id.clone();

        let value = operation(record).await.map_err(GuardedError::Operation)?;

        // A failed charge after success is only logged
        if let Some(increment) = &requirements.increment_usage {
            if let Err(err) = self
                .entitlement_repo
                .increment_usage(
                    &user_id,
                    increment.category,
                    increment.amount,
                    self.time_source.now(),
                )
                .await
            {
                tracing::error!(
                    error = ?err,
                    error_msg = %err,
                    %user_id,
                    category = %increment.category,
                    amount = increment.amount,
                    "Usage not charged for a completed operation"
                );
            }
        }

        Ok(value)
    }

    async fn authorize<E>(
        &self,
        requirements: &GuardRequirements,
    ) -> Result<EntitlementRecord, GuardedError<E>> {
        let Some(user_id) = self.current_session.user_id() else {
            return deny(GuardDenied::Unauthorized);
        };

        let Ok(user_id) = AccountID::try_new(user_id) else {
            return deny(GuardDenied::EntitlementNotFound);
        };

        let record = match self.entitlement_repo.get_entitlement_by_user_id(&user_id).await {
            Ok(record) => record,
            Err(GetEntitlementError::NotFound(_)) => return deny(GuardDenied::EntitlementNotFound),
            Err(GetEntitlementError::Internal(e)) => return Err(GuardedError::Internal(e)),
        };

        if !record.is_verified() {
            return deny(GuardDenied::EntitlementNotVerified {
                status: record.status,
            });
        }

        if self.config.recheck_ownership {
            match self
                .resolver
                .resolve(&record.wallet_address, ResolveMode::AllowCached)
                .await
            {
                Ok(resolution) if resolution.owns => {}
                Ok(_) => return deny(GuardDenied::OwnershipLost),
                Err(ResolveEntitlementError::VerificationFailed(_)) => {
                    return deny(GuardDenied::VerificationFailed);
                }
                Err(ResolveEntitlementError::Configuration(e)) => {
                    return Err(GuardedError::Internal(e.int_err()));
                }
                Err(ResolveEntitlementError::Internal(e)) => return Err(GuardedError::Internal(e)),
            }
        }

        if !record.tier.satisfies_any(&requirements.require_tiers) {
            return deny(GuardDenied::InsufficientTier {
                actual: record.tier,
                required: requirements.require_tiers.clone(),
            });
        }

        if let Some(category) = requirements.check_resource {
            let limit = record.resource_limits().limit(category);
            let usage = record.usage.usage(category);

            if usage >= limit {
                return deny(GuardDenied::ResourceLimitExceeded {
                    category,
                    limit,
                    usage,
                });
            }
        }

        Ok(record)
    }
}

fn deny<T, E>(reason: GuardDenied) -> Result<T, GuardedError<E>> {
    Err(GuardedError::Denied(reason))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
