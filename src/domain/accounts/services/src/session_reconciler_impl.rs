// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use dill::*;
use headers::HeaderMapExt;
use internal_error::InternalError;
use sha2::{Digest, Sha256};
use time_source::SystemTimeSource;
use tollgate_accounts::*;
use tollgate_auth_web3::{SessionCookieCodec, SessionCookiePayload, Web3AuthConfig};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const SESSION_ID_HEX_LEN: usize = 32;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SessionReconcilerImpl {
    federated_provider: Arc<dyn FederatedSessionProvider>,
    account_service: Arc<dyn AccountService>,
    cookie_codec: Arc<SessionCookieCodec>,
    web3_config: Arc<Web3AuthConfig>,
    time_source: Arc<dyn SystemTimeSource>,
}

#[component(pub)]
#[interface(dyn SessionReconciler)]
impl SessionReconcilerImpl {
    pub fn new(
        federated_provider: Arc<dyn FederatedSessionProvider>,
        account_service: Arc<dyn AccountService>,
        cookie_codec: Arc<SessionCookieCodec>,
        web3_config: Arc<Web3AuthConfig>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            federated_provider,
            account_service,
            cookie_codec,
            web3_config,
            time_source,
        }
    }

    async fn federated_session(&self, headers: &http::HeaderMap) -> Option<NormalizedSession> {
        match self.federated_provider.get_session(headers).await {
            Ok(Some(session)) if session.has_user() => Some(session),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(
                    error = ?err,
                    error_msg = %err.reason(),
                    "Federated session provider failed, treating as no session"
                );
                None
            }
        }
    }

    async fn wallet_session(
        &self,
        headers: &http::HeaderMap,
    ) -> Result<Option<NormalizedSession>, InternalError> {
        let Some(token) = headers
            .typed_get::<headers::Cookie>()
            .and_then(|cookie| cookie.get(&self.web3_config.cookie_name).map(str::to_string))
        else {
            return Ok(None);
        };

        let Some(payload) = self.cookie_codec.verify(&token, self.time_source.now()) else {
            return Ok(None);
        };

        let Ok(account_id) = AccountID::try_new(payload.subject_id.as_str()) else {
            return Ok(None);
        };

        let Some(account) = self.account_service.account_by_id(&account_id).await? else {
            tracing::debug!(%account_id, "Session cookie refers to an unknown account");
            return Ok(None);
        };

        if WalletAddressConvertor::lowercase_string(&account.wallet_address)
            != payload.wallet_address.to_ascii_lowercase()
        {
            tracing::warn!(
                %account_id,
                cookie_wallet = %payload.wallet_address,
                "Session cookie wallet does not match the account"
            );
            return Ok(None);
        }

        Ok(normalize_wallet_session(&account, &payload, &token))
    }
}

#[async_trait::async_trait]
impl SessionReconciler for SessionReconcilerImpl {
    #[tracing::instrument(level = "debug", skip_all)]
    async fn get_session(
        &self,
        headers: &http::HeaderMap,
    ) -> Result<Option<NormalizedSession>, InternalError> {
        if let Some(session) = self.federated_session(headers).await {
            return Ok(Some(session));
        }

        self.wallet_session(headers).await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn normalize_wallet_session(
    account: &Account,
    payload: &SessionCookiePayload,
    token: &str,
) -> Option<NormalizedSession> {
    let issued_at = payload.issued_at_time()?;
    let expires_at = payload.expires_at_time()?;

    let mut session_id = hex::encode(Sha256::digest(token.as_bytes()));
    session_id.truncate(SESSION_ID_HEX_LEN);

    Some(NormalizedSession {
        user: SessionUser {
            id: account.id.to_string(),
            email: account.email.clone(),
            name: account.display_name.clone(),
            image: account.avatar_url.clone(),
            email_verified: account.email_verified,
        },
        session: SessionInfo {
            id: session_id.clone(),
            user_id: account.id.to_string(),
            expires_at,
            // The cookie is http-only and must not surface in a session payload
            token: session_id,
            created_at: issued_at,
            updated_at: issued_at,
            active_organization_id: account.active_organization_id.clone(),
        },
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
