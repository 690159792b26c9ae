// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tollgate_accounts::{AccountID, WalletAddress};

use crate::{EntitlementStatus, ResourceLimits, Tier, UsageCounters};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// ERC-721 token identifier
pub type TokenId = U256;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Persisted result of on-chain verification for one user.
///
/// Exactly one record per user, and a wallet backs at most one record.
/// Limits are not stored: they follow from the tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementRecord {
    pub user_id: AccountID,
    pub wallet_address: WalletAddress,
    pub token_id: Option<TokenId>,
    pub tier: Tier,
    pub status: EntitlementStatus,
    pub usage: UsageCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntitlementRecord {
    pub fn resource_limits(&self) -> ResourceLimits {
        ResourceLimits::for_tier(self.tier)
    }

    pub fn is_verified(&self) -> bool {
        self.status == EntitlementStatus::Verified
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
