// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{EntitlementStatus, ResourceCategory, Tier};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardRequirements {
    /// Satisfied when the caller's tier ranks at or above any of these
    pub require_tiers: Vec<Tier>,
    /// Denies when usage of this category has reached the tier limit
    pub check_resource: Option<ResourceCategory>,
    /// Charged only after the guarded operation succeeds
    pub increment_usage: Option<UsageIncrement>,
}

impl GuardRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_tier(mut self, tier: Tier) -> Self {
        self.require_tiers.push(tier);
        self
    }

    pub fn check_resource(mut self, category: ResourceCategory) -> Self {
        self.check_resource = Some(category);
        self
    }

    pub fn increment_usage(mut self, category: ResourceCategory, amount: u64) -> Self {
        self.increment_usage = Some(UsageIncrement { category, amount });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageIncrement {
    pub category: ResourceCategory,
    pub amount: u64,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default)]
pub struct TierGuardConfig {
    /// Re-read ownership through the resolver (cache allowed) before each
    /// guarded operation
    pub recheck_ownership: bool,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Reasons a guarded operation was not executed. Messages are shown to
/// clients and carry no addresses or secrets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardDenied {
    #[error("Authentication required")]
    Unauthorized,

    #[error("No entitlement found, sign in with a wallet holding the access token")]
    EntitlementNotFound,

    #[error("Entitlement is {status}, re-verify token ownership")]
    EntitlementNotVerified { status: EntitlementStatus },

    #[error("Token ownership could not be verified, try again later")]
    VerificationFailed,

    #[error("Access token is no longer held by this wallet")]
    OwnershipLost,

    #[error("Tier '{actual}' is insufficient for this operation")]
    InsufficientTier { actual: Tier, required: Vec<Tier> },

    #[error("Limit of {limit} reached for {category}")]
    ResourceLimitExceeded {
        category: ResourceCategory,
        limit: u64,
        usage: u64,
    },
}

impl GuardDenied {
    /// `Unauthorized` maps to 401, every other denial to 403
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum GuardedError<E> {
    #[error(transparent)]
    Denied(GuardDenied),

    #[error(transparent)]
    Operation(E),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
