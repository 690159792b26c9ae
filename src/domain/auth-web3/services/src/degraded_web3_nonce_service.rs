// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use tollgate_auth_web3::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Nonce service used when no shared nonce store is configured.
///
/// Every nonce is accepted, so signed messages can be replayed within their
/// validity window. The state is logged loudly and reported through
/// [`Web3NonceService::protection_mode`].
pub struct DegradedWeb3NonceService {}

#[dill::component(pub)]
#[dill::interface(dyn Web3NonceService)]
#[dill::scope(dill::Singleton)]
impl DegradedWeb3NonceService {
    pub fn new() -> Self {
        tracing::warn!("No nonce store configured: replay protection of wallet sign-in is disabled");
        Self {}
    }
}

#[async_trait::async_trait]
impl Web3NonceService for DegradedWeb3NonceService {
    fn protection_mode(&self) -> NonceProtectionMode {
        NonceProtectionMode::Degraded
    }

    async fn issue_nonce(&self) -> Result<Web3AuthEip4361Nonce, IssueNonceError> {
        Ok(Web3AuthEip4361Nonce::new())
    }

    async fn consume_nonce(&self, nonce: &str) -> Result<bool, InternalError> {
        tracing::warn!(%nonce, "Nonce accepted without replay check");
        Ok(true)
    }

    async fn cleanup_expired_nonces(&self) -> Result<u64, InternalError> {
        Ok(0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
