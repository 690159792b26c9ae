// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::{InternalError, ResultIntoInternal};
use time_source::SystemTimeSource;
use tollgate_auth_web3::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct Web3NonceServiceImpl {
    nonce_repo: Arc<dyn Web3AuthNonceRepository>,
    config: Arc<Web3AuthConfig>,
    time_source: Arc<dyn SystemTimeSource>,
}

#[dill::component(pub)]
#[dill::interface(dyn Web3NonceService)]
impl Web3NonceServiceImpl {
    pub fn new(
        nonce_repo: Arc<dyn Web3AuthNonceRepository>,
        config: Arc<Web3AuthConfig>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            nonce_repo,
            config,
            time_source,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Web3NonceService for Web3NonceServiceImpl {
    fn protection_mode(&self) -> NonceProtectionMode {
        NonceProtectionMode::Enforced
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn issue_nonce(&self) -> Result<Web3AuthEip4361Nonce, IssueNonceError> {
        let entity = Web3AuthEip4361NonceEntity {
            nonce: Web3AuthEip4361Nonce::new(),
            expires_at: self.time_source.now() + self.config.nonce_ttl,
        };

        self.nonce_repo.set_nonce(&entity).await.int_err()?;

        Ok(entity.nonce)
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn consume_nonce(&self, nonce: &str) -> Result<bool, InternalError> {
        let Ok(nonce) = Web3AuthEip4361Nonce::try_new(nonce) else {
            tracing::debug!("Malformed nonce rejected");
            return Ok(false);
        };

        match self
            .nonce_repo
            .consume_nonce(&nonce, self.time_source.now())
            .await
        {
            Ok(()) => Ok(true),
            Err(ConsumeNonceError::NotFound(_)) => Ok(false),
            Err(ConsumeNonceError::Internal(e)) => Err(e),
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn cleanup_expired_nonces(&self) -> Result<u64, InternalError> {
        let purged = self
            .nonce_repo
            .cleanup_expired_nonces(self.time_source.now())
            .await
            .int_err()?;

        tracing::debug!(purged, "Expired nonces purged");

        Ok(purged)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
