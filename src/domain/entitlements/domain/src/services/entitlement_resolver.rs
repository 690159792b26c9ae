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
use tollgate_accounts::WalletAddress;

use crate::{ChainReadError, OwnershipResolution};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Always read the chain. Required for the first grant of access.
    Fresh,
    /// A result cached within the TTL may be served
    AllowCached,
}

#[async_trait::async_trait]
pub trait EntitlementResolver: Send + Sync {
    async fn resolve(
        &self,
        wallet: &WalletAddress,
        mode: ResolveMode,
    ) -> Result<OwnershipResolution, ResolveEntitlementError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ResolveEntitlementError {
    #[error(transparent)]
    Configuration(EntitlementsConfigurationError),

    #[error(transparent)]
    VerificationFailed(VerificationFailedError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Entitlements are misconfigured: {reason}")]
pub struct EntitlementsConfigurationError {
    pub reason: String,
}

/// Chain state could not be read. Callers must deny.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Ownership verification failed after {attempts} attempt(s)")]
pub struct VerificationFailedError {
    pub attempts: u32,
    #[source]
    pub last_error: ChainReadError,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
