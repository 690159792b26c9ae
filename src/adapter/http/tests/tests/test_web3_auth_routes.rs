// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use pretty_assertions::assert_eq;
use tollgate_accounts::WalletAddressConvertor;
use tollgate_adapter_http::HttpAuthConfig;
use tollgate_auth_web3::testing::{SiweMessageParams, Web3TestWallet};
use tollgate_entitlements::ChainReadError;

use crate::harness::{HttpHarness, REQUEST_HOST, t0};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_nonce_is_plain_text_and_not_cached() {
    let harness = HttpHarness::new();

    let response = harness.get("/auth/web3/nonce", None).await;

    assert_eq!(response.status, http::StatusCode::OK);
    assert_eq!(response.headers[http::header::CACHE_CONTROL], "no-store");
    assert!(
        response.headers[http::header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert!(response.body.len() >= 8);
    assert!(response.body.chars().all(|c| c.is_ascii_alphanumeric()));

    let another = harness.issue_nonce().await;
    assert_ne!(response.body, another);
}

#[test_log::test(tokio::test)]
async fn test_verify_sets_session_cookie() {
    let harness = HttpHarness::new();
    let wallet = Web3TestWallet::from_seed(1);

    let response = harness.login(&wallet).await;

    assert_eq!(response.status, http::StatusCode::OK, "{}", response.body);
    assert_eq!(
        response.json(),
        serde_json::json!({
            "ok": true,
            "address": WalletAddressConvertor::checksummed_string(&wallet.address()),
        })
    );

    let set_cookie = response.set_cookie();
    assert!(set_cookie.starts_with("siwe_session="));
    for attribute in ["HttpOnly", "Secure", "SameSite=Lax", "Path=/", "Max-Age=86400"] {
        assert!(
            set_cookie.contains(attribute),
            "'{attribute}' missing in '{set_cookie}'"
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_verify_foreign_signature_is_generic_unauthorized() {
    let harness = HttpHarness::new();
    let wallet = Web3TestWallet::from_seed(1);
    let impostor = Web3TestWallet::from_seed(2);

    let nonce = harness.issue_nonce().await;
    let message = wallet.siwe_message(&SiweMessageParams::new(nonce, t0()));

    let response = harness
        .post_verify(REQUEST_HOST, &message, &impostor.sign(&message))
        .await;

    assert_eq!(response.status, http::StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json(),
        serde_json::json!({ "message": "Unauthorized" })
    );
    assert!(response.headers.get(http::header::SET_COOKIE).is_none());
}

#[test_log::test(tokio::test)]
async fn test_verify_domain_mismatch_is_generic_unauthorized() {
    let harness = HttpHarness::new();
    let wallet = Web3TestWallet::from_seed(1);

    let nonce = harness.issue_nonce().await;
    let message = wallet.siwe_message(&SiweMessageParams::new(nonce, t0()));

    let response = harness
        .post_verify("phishing.example.com", &message, &wallet.sign(&message))
        .await;

    assert_eq!(response.status, http::StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json(),
        serde_json::json!({ "message": "Unauthorized" })
    );
}

#[test_log::test(tokio::test)]
async fn test_verify_replayed_nonce_is_rejected() {
    let harness = HttpHarness::new();
    let wallet = Web3TestWallet::from_seed(1);

    let nonce = harness.issue_nonce().await;
    let message = wallet.siwe_message(&SiweMessageParams::new(nonce, t0()));
    let signature = wallet.sign(&message);

    let first = harness
        .post_verify(REQUEST_HOST, &message, &signature)
        .await;
    assert_eq!(first.status, http::StatusCode::OK);

    let replay = harness
        .post_verify(REQUEST_HOST, &message, &signature)
        .await;
    assert_eq!(replay.status, http::StatusCode::UNAUTHORIZED);
    assert_eq!(
        replay.json(),
        serde_json::json!({ "message": "Unauthorized" })
    );
}

#[test_log::test(tokio::test)]
async fn test_verify_unknown_nonce_is_rejected() {
    let harness = HttpHarness::new();
    let wallet = Web3TestWallet::from_seed(1);

    let message = wallet.siwe_message(&SiweMessageParams::new("neverIssued42", t0()));

    let response = harness
        .post_verify(REQUEST_HOST, &message, &wallet.sign(&message))
        .await;

    assert_eq!(response.status, http::StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_logout_expires_cookie() {
    let harness = HttpHarness::new();

    let response = harness.post("/auth/web3/logout", None).await;

    assert_eq!(response.status, http::StatusCode::OK);
    assert_eq!(response.json(), serde_json::json!({ "ok": true }));

    let set_cookie = response.set_cookie();
    assert!(set_cookie.starts_with("siwe_session=;"), "{set_cookie}");
    assert!(set_cookie.contains("Max-Age=0"), "{set_cookie}");
    assert!(set_cookie.contains("Path=/"), "{set_cookie}");
}

#[test_log::test(tokio::test)]
async fn test_login_synchronizes_entitlement_when_enabled() {
    let harness = HttpHarness::with(
        HttpAuthConfig {
            sync_entitlements_on_login: true,
        },
        None,
    );
    let wallet = Web3TestWallet::from_seed(1);
    harness.contract.mint(wallet.address(), 3);

    let login = harness.login(&wallet).await;
    assert_eq!(login.status, http::StatusCode::OK);

    let cookie = login.session_cookie_pair();
    let response = harness.get("/entitlements/me", Some(&cookie)).await;

    assert_eq!(response.status, http::StatusCode::OK, "{}", response.body);
    let json = response.json();
    assert_eq!(json["tier"], "standard");
    assert_eq!(json["status"], "verified");
    assert_eq!(json["limits"]["workflows"], 10);
}

#[test_log::test(tokio::test)]
async fn test_login_survives_failed_synchronization() {
    let harness = HttpHarness::with(
        HttpAuthConfig {
            sync_entitlements_on_login: true,
        },
        None,
    );
    let wallet = Web3TestWallet::from_seed(1);
    harness.contract.mint(wallet.address(), 3).fail_next(
        1,
        ChainReadError::Reverted {
            method: "balanceOf",
        },
    );

    let login = harness.login(&wallet).await;
    assert_eq!(login.status, http::StatusCode::OK);

    let cookie = login.session_cookie_pair();
    let response = harness.get("/entitlements/me", Some(&cookie)).await;

    assert_eq!(response.status, http::StatusCode::NOT_FOUND);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
