// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::routing::{get, post};

use crate::{
    SessionLayer,
    entitlement_handler,
    entitlement_refresh_handler,
    session_handler,
    web3_logout_handler,
    web3_nonce_handler,
    web3_verify_handler,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// All gateway routes. The base [`dill::Catalog`] has to be provided by the
/// caller through an `Extension` layer.
pub fn tollgate_router() -> axum::Router {
    axum::Router::new()
        .merge(web3_auth_router())
        .merge(session_router().layer(SessionLayer::new()))
}

/// Handshake endpoints work on their own and never resolve a session
fn web3_auth_router() -> axum::Router {
    axum::Router::new()
        .route("/auth/web3/nonce", get(web3_nonce_handler))
        .route("/auth/web3/verify", post(web3_verify_handler))
        .route("/auth/web3/logout", post(web3_logout_handler))
}

fn session_router() -> axum::Router {
    axum::Router::new()
        .route("/auth/session", get(session_handler))
        .route("/entitlements/me", get(entitlement_handler))
        .route("/entitlements/me/refresh", post(entitlement_refresh_handler))
}
