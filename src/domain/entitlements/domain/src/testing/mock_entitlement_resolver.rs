// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tollgate_accounts::WalletAddress;

use crate::{EntitlementResolver, OwnershipResolution, ResolveEntitlementError, ResolveMode};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

mockall::mock! {
    pub EntitlementResolver {}

    #[async_trait::async_trait]
    impl EntitlementResolver for EntitlementResolver {
        async fn resolve(
            &self,
            wallet: &WalletAddress,
            mode: ResolveMode,
        ) -> Result<OwnershipResolution, ResolveEntitlementError>;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
