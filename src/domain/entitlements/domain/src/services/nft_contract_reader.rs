// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;
use tollgate_accounts::WalletAddress;

use crate::TokenId;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Read-only view of an ERC-721 contract. Each call is a single chain read
/// with its own timeout; retrying is the caller's decision.
#[async_trait::async_trait]
pub trait NftContractReader: Send + Sync {
    async fn balance_of(
        &self,
        contract: &WalletAddress,
        owner: &WalletAddress,
    ) -> Result<TokenId, ChainReadError>;

    /// Optional ERC-721 enumeration extension. Contracts without it revert.
    async fn token_of_owner_by_index(
        &self,
        contract: &WalletAddress,
        owner: &WalletAddress,
        index: u64,
    ) -> Result<TokenId, ChainReadError>;

    async fn owner_of(
        &self,
        contract: &WalletAddress,
        token_id: TokenId,
    ) -> Result<WalletAddress, ChainReadError>;

    async fn token_uri(
        &self,
        contract: &WalletAddress,
        token_id: TokenId,
    ) -> Result<String, ChainReadError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainReadError {
    #[error("Chain read '{method}' timed out")]
    Timeout { method: &'static str },

    /// The call executed and the contract rejected it. Not transient.
    #[error("Contract call '{method}' reverted")]
    Reverted { method: &'static str },

    #[error("Chain transport failure in '{method}': {reason}")]
    Transport { method: &'static str, reason: String },
}

impl ChainReadError {
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Reverted { .. })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
