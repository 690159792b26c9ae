// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::Extension;
use axum::body::Body;
use chrono::{DateTime, TimeZone, Utc};
use dill::{Catalog, CatalogBuilder};
use secrecy::SecretSlice;
use time_source::{SystemTimeSource, SystemTimeSourceStub};
use tollgate_accounts::testing::MockFederatedSessionProvider;
use tollgate_accounts::{Account, AccountService, FederatedSessionProvider, NormalizedSession};
use tollgate_accounts_inmem::InMemoryAccountRepository;
use tollgate_adapter_http::{HttpAuthConfig, tollgate_router};
use tollgate_auth_web3::testing::{SiweMessageParams, Web3TestWallet};
use tollgate_auth_web3::{
    MacStrategy,
    NonceProtectionMode,
    SessionCookieCodec,
    SessionCookieConfig,
    Web3AuthConfig,
};
use tollgate_auth_web3_inmem::InMemoryWeb3AuthNonceRepository;
use tollgate_entitlements::testing::FakeNftContract;
use tollgate_entitlements::{EntitlementsConfig, NftContractReader, TierGuardConfig};
use tollgate_entitlements_inmem::InMemoryEntitlementRepository;
use tower::ServiceExt;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) const REQUEST_HOST: &str = "localhost:8080";

const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 1, 12, 0, 0).unwrap()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) struct TestResponse {
    pub status: http::StatusCode,
    pub headers: http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn set_cookie(&self) -> &str {
        self.headers
            .get(http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
    }

    /// `name=value` part of the issued cookie, ready for a `Cookie` header
    pub fn session_cookie_pair(&self) -> String {
        let (pair, _) = self.set_cookie().split_once(';').unwrap();
        pair.to_string()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Gateway router over in-memory stores and a scriptable contract
pub(crate) struct HttpHarness {
    catalog: Catalog,
    pub contract: FakeNftContract,
}

impl HttpHarness {
    pub fn new() -> Self {
        Self::with(HttpAuthConfig::default(), None)
    }

    pub fn with(http_config: HttpAuthConfig, federated_session: Option<NormalizedSession>) -> Self {
        let contract = FakeNftContract::new();

        let mut b = CatalogBuilder::new();

        tollgate_accounts_services::register_dependencies(&mut b);
        tollgate_auth_web3_services::register_dependencies(&mut b, NonceProtectionMode::Enforced);
        tollgate_entitlements_services::register_dependencies(&mut b);

        b.add::<InMemoryAccountRepository>()
            .add::<InMemoryWeb3AuthNonceRepository>()
            .add::<InMemoryEntitlementRepository>()
            .add::<SessionCookieCodec>()
            .add_value(SessionCookieConfig {
                signing_key: SecretSlice::from(b"tollgate-http-adapter-test-key-01".to_vec()),
                mac_strategy: MacStrategy::Ring,
            })
            .add_value(Web3AuthConfig::default())
            .add_value(EntitlementsConfig {
                contract_address: Some(
                    tollgate_accounts::WalletAddressConvertor::parse(CONTRACT).unwrap(),
                ),
                ..EntitlementsConfig::default()
            })
            .add_value(TierGuardConfig::default())
            .add_value(http_config)
            .add_value(MockFederatedSessionProvider::returning_session(
                federated_session,
            ))
            .bind::<dyn FederatedSessionProvider, MockFederatedSessionProvider>()
            .add_value(contract.clone())
            .bind::<dyn NftContractReader, FakeNftContract>()
            .add_value(SystemTimeSourceStub::new_set(t0()))
            .bind::<dyn SystemTimeSource, SystemTimeSourceStub>();

        Self {
            catalog: b.build(),
            contract,
        }
    }

    pub async fn send(&self, request: http::Request<Body>) -> TestResponse {
        let router = tollgate_router().layer(Extension(self.catalog.clone()));

        let response = router.oneshot(request).await.unwrap();

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = http::Request::get(path).header(http::header::HOST, REQUEST_HOST);
        if let Some(cookie) = cookie {
            request = request.header(http::header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = http::Request::post(path).header(http::header::HOST, REQUEST_HOST);
        if let Some(cookie) = cookie {
            request = request.header(http::header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn issue_nonce(&self) -> String {
        let response = self.get("/auth/web3/nonce", None).await;
        assert_eq!(response.status, http::StatusCode::OK);
        response.body
    }

    pub async fn post_verify(
        &self,
        host: &str,
        message: &str,
        signature: &str,
    ) -> TestResponse {
        let body = serde_json::json!({
            "message": message,
            "signature": signature,
        });

        self.send(
            http::Request::post("/auth/web3/verify")
                .header(http::header::HOST, host)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Full handshake: fresh nonce, signed challenge, verification
    pub async fn login(&self, wallet: &Web3TestWallet) -> TestResponse {
        let nonce = self.issue_nonce().await;
        let message = wallet.siwe_message(&SiweMessageParams::new(nonce, t0()));

        self.post_verify(REQUEST_HOST, &message, &wallet.sign(&message))
            .await
    }

    /// Account registered for the wallet by a previous login
    pub async fn account_of(&self, wallet: &Web3TestWallet) -> Account {
        let account_service = self.catalog.get_one::<dyn AccountService>().unwrap();
        account_service
            .upsert_wallet_account(&wallet.address())
            .await
            .unwrap()
    }
}
