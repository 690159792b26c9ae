// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::extract::Extension;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dill::Catalog;
use http_common::*;
use internal_error::{InternalError, ResultIntoInternal};
use tollgate_accounts::{Account, WalletAddressConvertor};
use tollgate_auth_web3::{
    HandshakeRequest,
    IssueNonceError,
    SessionCookieAttributes,
    Web3AuthConfig,
    Web3HandshakeVerifier,
    Web3NonceService,
};
use tollgate_entitlements::EntitlementSyncService;

use crate::HttpAuthConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Web3VerifyRequest {
    pub message: String,
    pub signature: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Web3VerifyResponse {
    pub ok: bool,
    pub address: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Web3LogoutResponse {
    pub ok: bool,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Issues a single-use challenge nonce as plain text
pub async fn web3_nonce_handler(
    Extension(catalog): Extension<Catalog>,
) -> Result<impl IntoResponse, ApiError> {
    let nonce_service = catalog.get_one::<dyn Web3NonceService>().int_err()?;

    let nonce = nonce_service.issue_nonce().await.map_err(|e| match e {
        IssueNonceError::Internal(e) => e.api_err(),
    })?;

    Ok((
        [
            (http::header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (http::header::CACHE_CONTROL, "no-store"),
        ],
        nonce.to_string(),
    ))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Verifies a signed challenge and sets the wallet session cookie.
///
/// Every verification failure is reported as the same `401`.
#[tracing::instrument(level = "debug", skip_all)]
pub async fn web3_verify_handler(
    Extension(catalog): Extension<Catalog>,
    headers: http::HeaderMap,
    uri: http::Uri,
    jar: CookieJar,
    Json(body): Json<Web3VerifyRequest>,
) -> Result<(CookieJar, Json<Web3VerifyResponse>), ApiError> {
    let verifier = catalog.get_one::<dyn Web3HandshakeVerifier>().int_err()?;

    let outcome = verifier
        .verify(HandshakeRequest {
            message: body.message,
            signature: body.signature,
            request_host: request_host(&headers, &uri),
        })
        .await
        .api_err()?;

    tracing::info!(
        account_id = %outcome.account.id,
        wallet_address = %outcome.payload.wallet_address,
        "Wallet signed in"
    );

    let http_config = catalog.get_one::<HttpAuthConfig>().int_err()?;
    if http_config.sync_entitlements_on_login {
        sync_entitlement_after_login(&catalog, &outcome.account).await?;
    }

    let jar = jar.add(session_cookie(&outcome.cookie, outcome.token));

    Ok((
        jar,
        Json(Web3VerifyResponse {
            ok: true,
            address: WalletAddressConvertor::checksummed_string(&outcome.account.wallet_address),
        }),
    ))
}

/// A failed chain read must not fail the login
async fn sync_entitlement_after_login(
    catalog: &Catalog,
    account: &Account,
) -> Result<(), InternalError> {
    let sync_service = catalog.get_one::<dyn EntitlementSyncService>().int_err()?;

    match sync_service.sync(&account.id, &account.wallet_address).await {
        Ok(record) => {
            tracing::debug!(
                account_id = %account.id,
                tier = ?record.as_ref().map(|r| r.tier),
                "Entitlement synchronized on login"
            );
        }
        Err(e) => {
            tracing::warn!(
                account_id = %account.id,
                error = ?e,
                error_msg = %e,
                "Entitlement synchronization on login failed"
            );
        }
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Expires the wallet session cookie. Federated sessions are untouched.
pub async fn web3_logout_handler(
    Extension(catalog): Extension<Catalog>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Web3LogoutResponse>), ApiError> {
    let web3_config = catalog.get_one::<Web3AuthConfig>().int_err()?;

    let mut attributes = SessionCookieAttributes::from_config(&web3_config);
    attributes.max_age = chrono::Duration::zero();

    let jar = jar.add(session_cookie(&attributes, String::new()));

    Ok((jar, Json(Web3LogoutResponse { ok: true })))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn session_cookie(attributes: &SessionCookieAttributes, value: String) -> Cookie<'static> {
    let same_site = if attributes.same_site_lax {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    Cookie::build((attributes.name.clone(), value))
        .http_only(attributes.http_only)
        .secure(attributes.secure)
        .same_site(same_site)
        .path(attributes.path.clone())
        .max_age(time::Duration::seconds(attributes.max_age.num_seconds()))
        .build()
}

/// `Host` header first, then the authority of an absolute request URI
fn request_host(headers: &http::HeaderMap, uri: &http::Uri) -> String {
    headers
        .get(http::header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
        .or_else(|| uri.authority().map(ToString::to_string))
        .unwrap_or_default()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
