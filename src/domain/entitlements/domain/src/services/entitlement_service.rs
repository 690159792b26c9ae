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
use tollgate_accounts::AccountID;

use crate::{EntitlementNotFoundError, EntitlementRecord, EntitlementStatus};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait EntitlementService: Send + Sync {
    async fn get_entitlement(
        &self,
        user_id: &AccountID,
    ) -> Result<Option<EntitlementRecord>, InternalError>;

    /// Out-of-band policy transition into `expired` or `revoked`
    async fn set_entitlement_status(
        &self,
        user_id: &AccountID,
        status: EntitlementStatus,
    ) -> Result<EntitlementRecord, ChangeEntitlementStatusError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ChangeEntitlementStatusError {
    #[error("Status '{status}' cannot be set out of band")]
    UnsupportedStatus { status: EntitlementStatus },

    #[error(transparent)]
    NotFound(EntitlementNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
