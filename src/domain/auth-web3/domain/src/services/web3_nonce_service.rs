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

use crate::Web3AuthEip4361Nonce;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceProtectionMode {
    /// Nonces are stored and consumed at most once
    Enforced,
    /// No store is configured and every nonce is accepted. Replay protection
    /// is off.
    Degraded,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait Web3NonceService: Send + Sync {
    fn protection_mode(&self) -> NonceProtectionMode;

    async fn issue_nonce(&self) -> Result<Web3AuthEip4361Nonce, IssueNonceError>;

    /// `true` exactly once per issued, unexpired nonce. Malformed values
    /// consume to `false`.
    async fn consume_nonce(&self, nonce: &str) -> Result<bool, InternalError>;

    /// Returns the number of purged records
    async fn cleanup_expired_nonces(&self) -> Result<u64, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum IssueNonceError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
