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

/// External identity provider, consumed as an opaque
/// `get_session(headers)` call.
///
/// `Ok(None)` means the request carries no provider session. Errors are
/// transport or protocol failures.
#[async_trait::async_trait]
pub trait FederatedSessionProvider: Send + Sync {
    async fn get_session(
        &self,
        headers: &http::HeaderMap,
    ) -> Result<Option<NormalizedSession>, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
