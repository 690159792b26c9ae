// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;

use crate::NormalizedSession;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Produces one [`NormalizedSession`] out of whichever proof of identity the
/// request carries: a federated provider session first, the wallet session
/// cookie second.
///
/// Invalid, expired or tampered credentials yield `Ok(None)`. Only
/// account-store failures surface as errors.
#[async_trait::async_trait]
pub trait SessionReconciler: Send + Sync {
    async fn get_session(
        &self,
        headers: &http::HeaderMap,
    ) -> Result<Option<NormalizedSession>, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
