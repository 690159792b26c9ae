// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;

use crate::{IssueNonceError, NonceProtectionMode, Web3AuthEip4361Nonce, Web3NonceService};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

mockall::mock! {
    pub Web3NonceService {}

    #[async_trait::async_trait]
    impl Web3NonceService for Web3NonceService {
        fn protection_mode(&self) -> NonceProtectionMode;

        async fn issue_nonce(&self) -> Result<Web3AuthEip4361Nonce, IssueNonceError>;

        async fn consume_nonce(&self, nonce: &str) -> Result<bool, InternalError>;

        async fn cleanup_expired_nonces(&self) -> Result<u64, InternalError>;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
