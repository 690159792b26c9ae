// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;
use tollgate_accounts::WalletAddress;

use crate::{Tier, TokenId};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_ENTITLEMENT_CACHE_TTL_SECONDS: i64 = 60;
pub const DEFAULT_RPC_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_RPC_BACKOFF_MILLIS: i64 = 250;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct EntitlementsConfig {
    /// Gating ERC-721 contract. Resolution fails closed while unset.
    pub contract_address: Option<WalletAddress>,
    pub premium_token_ids: TokenIdAllowList,
    pub enterprise_token_ids: TokenIdAllowList,
    /// Token checked with `ownerOf` when the contract lacks enumeration.
    /// Only reliable for contracts holding a handful of tokens.
    pub fallback_token_id: Option<TokenId>,
    pub cache_ttl: Duration,
    pub rpc_max_attempts: u32,
    pub rpc_backoff: Duration,
    pub fetch_metadata: bool,
}

impl Default for EntitlementsConfig {
    fn default() -> Self {
        Self {
            contract_address: None,
            premium_token_ids: TokenIdAllowList::default(),
            enterprise_token_ids: TokenIdAllowList::default(),
            fallback_token_id: None,
            cache_ttl: Duration::seconds(DEFAULT_ENTITLEMENT_CACHE_TTL_SECONDS),
            rpc_max_attempts: DEFAULT_RPC_MAX_ATTEMPTS,
            rpc_backoff: Duration::milliseconds(DEFAULT_RPC_BACKOFF_MILLIS),
            fetch_metadata: false,
        }
    }
}

impl EntitlementsConfig {
    /// Enterprise list first, then premium, otherwise standard
    pub fn classify(&self, token_id: TokenId) -> Tier {
        if self.enterprise_token_ids.contains(token_id) {
            Tier::Enterprise
        } else if self.premium_token_ids.contains(token_id) {
            Tier::Premium
        } else {
            Tier::Standard
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Set of token ids given as inclusive ranges, written as `"1-5,9,20-24"`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenIdAllowList {
    ranges: Vec<(TokenId, TokenId)>,
}

impl TokenIdAllowList {
    pub fn new(ranges: Vec<(TokenId, TokenId)>) -> Self {
        Self { ranges }
    }

    pub fn contains(&self, token_id: TokenId) -> bool {
        self.ranges
            .iter()
            .any(|(first, last)| *first <= token_id && token_id <= *last)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromStr for TokenIdAllowList {
    type Err = ParseTokenIdAllowListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |item: &str| ParseTokenIdAllowListError {
            item: item.to_string(),
        };

        let mut ranges = Vec::new();

        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (first, last) = match item.split_once('-') {
                Some((first, last)) => (first.trim(), last.trim()),
                None => (item, item),
            };

            let first = TokenId::from_str(first).map_err(|_| invalid(item))?;
            let last = TokenId::from_str(last).map_err(|_| invalid(item))?;
            if first > last {
                return Err(invalid(item));
            }

            ranges.push((first, last));
        }

        Ok(Self { ranges })
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid token id range: '{item}'")]
pub struct ParseTokenIdAllowListError {
    pub item: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
