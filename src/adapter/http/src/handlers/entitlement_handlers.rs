// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::extract::Extension;
use axum::response::Json;
use dill::Catalog;
use http_common::*;
use internal_error::ResultIntoInternal;
use thiserror::Error;
use tollgate_accounts::{AccountID, AccountService, CurrentSession};
use tollgate_entitlements::{
    EntitlementRecord,
    EntitlementService,
    EntitlementSyncService,
    ResourceLimits,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementResponse {
    #[serde(flatten)]
    pub record: EntitlementRecord,
    pub limits: ResourceLimits,
}

impl From<EntitlementRecord> for EntitlementResponse {
    fn from(record: EntitlementRecord) -> Self {
        Self {
            limits: record.resource_limits(),
            record,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Entitlement of the caller together with the limits of its tier
pub async fn entitlement_handler(
    Extension(catalog): Extension<Catalog>,
) -> Result<Json<EntitlementResponse>, ApiError> {
    let account_id = require_account_id(&catalog)?;

    let entitlement_service = catalog.get_one::<dyn EntitlementService>().int_err()?;

    match entitlement_service.get_entitlement(&account_id).await? {
        Some(record) => Ok(Json(record.into())),
        None => Err(ApiError::not_found(NoEntitlementError)),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Re-reads ownership of the caller's wallet on chain and stores the result
#[tracing::instrument(level = "debug", skip_all)]
pub async fn entitlement_refresh_handler(
    Extension(catalog): Extension<Catalog>,
) -> Result<Json<EntitlementResponse>, ApiError> {
    let account_id = require_account_id(&catalog)?;

    let account_service = catalog.get_one::<dyn AccountService>().int_err()?;
    let Some(account) = account_service.account_by_id(&account_id).await? else {
        // Federated identities are never linked to a wallet
        return Err(ApiError::forbidden(NoWalletLinkedError));
    };

    let sync_service = catalog.get_one::<dyn EntitlementSyncService>().int_err()?;

    match sync_service
        .sync(&account.id, &account.wallet_address)
        .await
        .api_err()?
    {
        Some(record) => Ok(Json(record.into())),
        None => Err(ApiError::forbidden(NoQualifyingTokenError)),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn require_account_id(catalog: &Catalog) -> Result<AccountID, ApiError> {
    let current_session = catalog.get_one::<CurrentSession>().int_err()?;

    let Some(user_id) = current_session.user_id() else {
        return Err(ApiError::new_unauthorized());
    };

    // Provider ids outside of the account id format cannot own a record
    AccountID::try_new(user_id).map_err(|_| ApiError::not_found(NoEntitlementError))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("No entitlement exists for the current user")]
struct NoEntitlementError;

#[derive(Error, Debug)]
#[error("No wallet is linked to the current session")]
struct NoWalletLinkedError;

#[derive(Error, Debug)]
#[error("The linked wallet does not hold a qualifying token")]
struct NoQualifyingTokenError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
