// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Access level derived from verified NFT ownership.
///
/// Declaration order is the rank order: `None < Standard < Premium < Enterprise`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    None,
    Standard,
    Premium,
    Enterprise,
}

impl Tier {
    pub fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Standard => 1,
            Self::Premium => 2,
            Self::Enterprise => 3,
        }
    }

    /// True when this tier ranks at or above at least one of `required`.
    /// An empty requirement is always satisfied.
    pub fn satisfies_any(self, required: &[Tier]) -> bool {
        required.is_empty() || required.iter().any(|r| self.rank() >= r.rank())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntitlementStatus {
    Pending,
    Verified,
    Expired,
    Revoked,
}

impl EntitlementStatus {
    /// Statuses that may only be entered through out-of-band policy
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Revoked)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
