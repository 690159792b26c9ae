// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use tollgate_accounts::WalletAddress;

use crate::{Tier, TokenId};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub token_uri: String,
}

/// Outcome of reading a wallet's ownership from the gating contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipResolution {
    pub wallet_address: WalletAddress,
    /// `owned_count > 0` and the resolved token is confirmed by `ownerOf`
    pub owns: bool,
    pub token_id: Option<TokenId>,
    pub tier: Tier,
    pub owned_count: u64,
    /// Result of the direct `ownerOf` confirmation
    pub is_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

impl OwnershipResolution {
    pub fn not_owned(wallet_address: WalletAddress, owned_count: u64) -> Self {
        Self {
            wallet_address,
            owns: false,
            token_id: None,
            tier: Tier::None,
            owned_count,
            is_owner: false,
            metadata: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
