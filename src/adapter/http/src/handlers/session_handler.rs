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
use tollgate_accounts::{CurrentSession, NormalizedSession};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Returns the reconciled session of the caller, or `null`
pub async fn session_handler(
    Extension(catalog): Extension<Catalog>,
) -> Result<Json<Option<NormalizedSession>>, ApiError> {
    let current_session = catalog.get_one::<CurrentSession>().int_err()?;

    Ok(Json(current_session.session().cloned()))
}
