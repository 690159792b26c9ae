// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::InternalError;
use time_source::SystemTimeSource;
use tollgate_accounts::AccountID;
use tollgate_entitlements::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct EntitlementServiceImpl {
    entitlement_repo: Arc<dyn EntitlementRepository>,
    time_source: Arc<dyn SystemTimeSource>,
}

#[dill::component(pub)]
#[dill::interface(dyn EntitlementService)]
impl EntitlementServiceImpl {
    pub fn new(
        entitlement_repo: Arc<dyn EntitlementRepository>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            entitlement_repo,
            time_source,
        }
    }
}

#[async_trait::async_trait]
impl EntitlementService for EntitlementServiceImpl {
    async fn get_entitlement(
        &self,
        user_id: &AccountID,
    ) -> Result<Option<EntitlementRecord>, InternalError> {
        match self.entitlement_repo.get_entitlement_by_user_id(user_id).await {
            Ok(record) => Ok(Some(record)),
            Err(GetEntitlementError::NotFound(_)) => Ok(None),
            Err(GetEntitlementError::Internal(e)) => Err(e),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%user_id, %status))]
    async fn set_entitlement_status(
        &self,
        user_id: &AccountID,
        status: EntitlementStatus,
    ) -> Result<EntitlementRecord, ChangeEntitlementStatusError> {
        if !status.is_terminal() {
            return Err(ChangeEntitlementStatusError::UnsupportedStatus { status });
        }

        let record = self
            .entitlement_repo
            .set_entitlement_status(user_id, status, self.time_source.now())
            .await
            .map_err(|e| match e {
                SetEntitlementStatusError::NotFound(e) => ChangeEntitlementStatusError::NotFound(e),
                SetEntitlementStatusError::Internal(e) => ChangeEntitlementStatusError::Internal(e),
            })?;

        tracing::info!("Entitlement status changed out of band");

        Ok(record)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
