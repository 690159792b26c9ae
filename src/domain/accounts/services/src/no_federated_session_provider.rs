// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::*;
use internal_error::InternalError;
use tollgate_accounts::{FederatedSessionProvider, NormalizedSession};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Used when no federated identity provider is configured
#[component(pub)]
#[interface(dyn FederatedSessionProvider)]
pub struct NoFederatedSessionProvider {}

#[async_trait::async_trait]
impl FederatedSessionProvider for NoFederatedSessionProvider {
    async fn get_session(
        &self,
        _headers: &http::HeaderMap,
    ) -> Result<Option<NormalizedSession>, InternalError> {
        Ok(None)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
