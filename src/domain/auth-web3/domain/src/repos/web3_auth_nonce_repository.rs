// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use internal_error::InternalError;
use thiserror::Error;

use crate::{Web3AuthEip4361Nonce, Web3AuthEip4361NonceEntity};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Shared TTL store of issued challenge nonces, keyed by the nonce value
#[async_trait::async_trait]
pub trait Web3AuthNonceRepository: Send + Sync {
    async fn set_nonce(&self, entity: &Web3AuthEip4361NonceEntity) -> Result<(), SetNonceError>;

    /// Deletes the nonce if it exists and has not expired at `now`.
    ///
    /// Existence check and deletion are a single atomic step, so among
    /// concurrent callers at most one succeeds.
    async fn consume_nonce(
        &self,
        nonce: &Web3AuthEip4361Nonce,
        now: DateTime<Utc>,
    ) -> Result<(), ConsumeNonceError>;

    /// Returns the number of purged records
    async fn cleanup_expired_nonces(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, CleanupExpiredNoncesError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SetNonceError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for SetNonceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ConsumeNonceError {
    #[error(transparent)]
    NotFound(NonceNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Nonce not found or expired: '{nonce}'")]
pub struct NonceNotFoundError {
    pub nonce: Web3AuthEip4361Nonce,
}

impl PartialEq for ConsumeNonceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CleanupExpiredNoncesError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for CleanupExpiredNoncesError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
