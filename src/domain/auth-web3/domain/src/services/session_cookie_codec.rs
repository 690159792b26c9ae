// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crypto_utils::{
    MessageAuthenticator,
    PortableHmacSha256,
    RingHmacSha256,
    open_token,
    sign_token,
};
use internal_error::{InternalError, ResultIntoInternal};
use secrecy::ExposeSecret;

use crate::{MacStrategy, SessionCookieConfig, SessionCookiePayload};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Signs and verifies wallet session cookies.
///
/// Verification never errors: a token that is malformed, tampered with,
/// incomplete or expired decodes to `None`.
pub struct SessionCookieCodec {
    config: Arc<SessionCookieConfig>,
    authenticator: Box<dyn MessageAuthenticator>,
}

#[dill::component(pub)]
#[dill::scope(dill::Singleton)]
impl SessionCookieCodec {
    pub fn new(config: Arc<SessionCookieConfig>) -> Self {
        let authenticator: Box<dyn MessageAuthenticator> = match config.mac_strategy {
            MacStrategy::Ring => Box::new(RingHmacSha256),
            MacStrategy::Portable => Box::new(PortableHmacSha256),
        };

        Self {
            config,
            authenticator,
        }
    }

    pub fn sign(&self, payload: &SessionCookiePayload) -> Result<String, InternalError> {
        let body = serde_json::to_vec(payload).int_err()?;

        Ok(sign_token(
            self.authenticator.as_ref(),
            self.config.signing_key.expose_secret(),
            &body,
        ))
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<SessionCookiePayload> {
        let body = match open_token(
            self.authenticator.as_ref(),
            self.config.signing_key.expose_secret(),
            token,
        ) {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(error = %err, "Session cookie rejected");
                return None;
            }
        };

        let payload: SessionCookiePayload = serde_json::from_slice(&body).ok()?;

        if !payload.has_required_fields() {
            tracing::debug!("Session cookie rejected: incomplete payload");
            return None;
        }

        if payload.expires_at <= payload.issued_at || payload.expires_at <= now.timestamp() {
            tracing::debug!(
                subject_id = %payload.subject_id,
                expires_at = payload.expires_at,
                "Session cookie rejected: expired"
            );
            return None;
        }

        Some(payload)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
