// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use dill::CatalogBuilder;
use pretty_assertions::assert_eq;
use secrecy::SecretSlice;
use time_source::{SystemTimeSource, SystemTimeSourceStub};
use tollgate_accounts::testing::{MockAccountService, MockFederatedSessionProvider, federated_session};
use tollgate_accounts::*;
use tollgate_accounts_services::SessionReconcilerImpl;
use tollgate_auth_web3::{
    MacStrategy,
    SessionCookieCodec,
    SessionCookieConfig,
    SessionCookiePayload,
    Web3AuthConfig,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const WALLET: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";
const OTHER_WALLET: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
const SIGNING_KEY: &[u8] = b"tollgate-reconciler-test-key-0001";

#[test_log::test(tokio::test)]
async fn test_federated_session_wins() {
    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::returning_session(Some(federated_session(
            "fed-user",
            t0(),
        ))),
        MockAccountService::with_account(wallet_account()),
    );

    let token = harness.sign_cookie(&harness.wallet_payload());
    let session = harness.reconcile(Some(&token)).await.unwrap();

    assert_eq!(session.user_id(), "fed-user");
    assert_eq!(session.session.token, "provider-token-fed-user");
}

#[test_log::test(tokio::test)]
async fn test_federated_session_without_user_falls_through() {
    let mut userless = federated_session("fed-user", t0());
    userless.user.id = String::new();

    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::returning_session(Some(userless)),
        MockAccountService::with_account(wallet_account()),
    );

    let token = harness.sign_cookie(&harness.wallet_payload());
    let session = harness.reconcile(Some(&token)).await.unwrap();

    assert_eq!(session.user_id(), "acc-0001");
}

#[test_log::test(tokio::test)]
async fn test_provider_failure_falls_back_to_wallet_cookie() {
    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::unreachable(),
        MockAccountService::with_account(wallet_account()),
    );

    let token = harness.sign_cookie(&harness.wallet_payload());
    let session = harness.reconcile(Some(&token)).await.unwrap();

    assert_eq!(session.user_id(), "acc-0001");
}

#[test_log::test(tokio::test)]
async fn test_wallet_cookie_is_normalized() {
    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::returning_session(None),
        MockAccountService::with_account(wallet_account()),
    );

    let token = harness.sign_cookie(&harness.wallet_payload());
    let session = harness.reconcile(Some(&token)).await.unwrap();

    let account = wallet_account();
    assert_eq!(
        session,
        NormalizedSession {
            user: SessionUser {
                id: "acc-0001".to_string(),
                email: account.email.clone(),
                name: account.display_name.clone(),
                image: None,
                email_verified: false,
            },
            session: SessionInfo {
                id: session.session.id.clone(),
                user_id: "acc-0001".to_string(),
                expires_at: t0() + Duration::days(1),
                token: session.session.id.clone(),
                created_at: t0(),
                updated_at: t0(),
                active_organization_id: None,
            },
        }
    );
    assert_eq!(session.session.id.len(), 32);
    assert!(session.session.id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(session.session.token, token);

    // Same cookie, same session id
    let again = harness.reconcile(Some(&token)).await.unwrap();
    assert_eq!(again.session.id, session.session.id);
}

#[test_log::test(tokio::test)]
async fn test_no_cookie_is_anonymous() {
    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::returning_session(None),
        MockAccountService::with_account(wallet_account()),
    );

    assert_eq!(harness.reconcile(None).await, None);
}

#[test_log::test(tokio::test)]
async fn test_tampered_cookie_is_anonymous() {
    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::returning_session(None),
        MockAccountService::with_account(wallet_account()),
    );

    let token = harness.sign_cookie(&harness.wallet_payload());
    let (body, tag) = token.split_once('.').unwrap();
    let flipped = if tag.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{body}.{flipped}{}", &tag[1..]);

    assert_eq!(harness.reconcile(Some(&tampered)).await, None);
}

#[test_log::test(tokio::test)]
async fn test_expired_cookie_is_anonymous() {
    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::returning_session(None),
        MockAccountService::with_account(wallet_account()),
    );

    let token = harness.sign_cookie(&harness.wallet_payload());
    harness.time_source.advance(Duration::days(1));

    assert_eq!(harness.reconcile(Some(&token)).await, None);
}

#[test_log::test(tokio::test)]
async fn test_cookie_of_unknown_account_is_anonymous() {
    let mut stranger = wallet_account();
    stranger.id = AccountID::try_new("acc-9999").unwrap();

    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::returning_session(None),
        MockAccountService::with_account(stranger),
    );

    let token = harness.sign_cookie(&harness.wallet_payload());

    assert_eq!(harness.reconcile(Some(&token)).await, None);
}

#[test_log::test(tokio::test)]
async fn test_cookie_wallet_mismatch_is_anonymous() {
    let harness = SessionReconcilerHarness::new(
        MockFederatedSessionProvider::returning_session(None),
        MockAccountService::with_account(wallet_account()),
    );

    let payload = SessionCookiePayload {
        wallet_address: OTHER_WALLET.to_lowercase(),
        ..harness.wallet_payload()
    };
    let token = harness.sign_cookie(&payload);

    assert_eq!(harness.reconcile(Some(&token)).await, None);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 1, 12, 0, 0).unwrap()
}

fn wallet_account() -> Account {
    Account::new_wallet_account(
        AccountID::try_new("acc-0001").unwrap(),
        &WalletAddressConvertor::parse(WALLET).unwrap(),
        t0(),
    )
}

struct SessionReconcilerHarness {
    reconciler: Arc<dyn SessionReconciler>,
    cookie_codec: Arc<SessionCookieCodec>,
    time_source: SystemTimeSourceStub,
}

impl SessionReconcilerHarness {
    fn new(
        federated_provider: MockFederatedSessionProvider,
        account_service: MockAccountService,
    ) -> Self {
        let time_source = SystemTimeSourceStub::new_set(t0());

        let catalog = {
            let mut b = CatalogBuilder::new();
            b.add::<SessionReconcilerImpl>();
            b.add::<SessionCookieCodec>();
            b.add_value(SessionCookieConfig {
                signing_key: SecretSlice::from(SIGNING_KEY.to_vec()),
                mac_strategy: MacStrategy::Ring,
            });
            b.add_value(Web3AuthConfig::default());
            b.add_value(federated_provider);
            b.bind::<dyn FederatedSessionProvider, MockFederatedSessionProvider>();
            b.add_value(account_service);
            b.bind::<dyn AccountService, MockAccountService>();
            b.add_value(time_source.clone());
            b.bind::<dyn SystemTimeSource, SystemTimeSourceStub>();
            b.build()
        };

        Self {
            reconciler: catalog.get_one().unwrap(),
            cookie_codec: catalog.get_one().unwrap(),
            time_source,
        }
    }

    fn wallet_payload(&self) -> SessionCookiePayload {
        let now = self.time_source.now();
        SessionCookiePayload::new(
            &AccountID::try_new("acc-0001").unwrap(),
            &WalletAddressConvertor::parse(WALLET).unwrap(),
            now,
            now + Duration::days(1),
        )
    }

    fn sign_cookie(&self, payload: &SessionCookiePayload) -> String {
        self.cookie_codec.sign(payload).unwrap()
    }

    async fn reconcile(&self, cookie: Option<&str>) -> Option<NormalizedSession> {
        let mut headers = http::HeaderMap::new();
        if let Some(token) = cookie {
            headers.insert(
                http::header::COOKIE,
                format!("theme=dark; siwe_session={token}").parse().unwrap(),
            );
        }

        self.reconciler.get_session(&headers).await.unwrap()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
