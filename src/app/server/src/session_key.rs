// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crypto_utils::{MessageAuthenticator, PortableHmacSha256, RingHmacSha256, derive_key};
use secrecy::{ExposeSecret, SecretSlice};
use tollgate_auth_web3::{
    MIN_SESSION_KEY_LEN,
    MacStrategy,
    SESSION_KEY_DERIVATION_LABEL,
    SessionCookieConfig,
};

use crate::{ConfigError, SessionConfig};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Resolves the cookie signing key.
///
/// An explicit key must be at least [`MIN_SESSION_KEY_LEN`] bytes long. A
/// base secret is turned into a key bound to the session cookie purpose.
pub fn session_cookie_config(session: &SessionConfig) -> Result<SessionCookieConfig, ConfigError> {
    let mac_strategy = MacStrategy::from(session.mac_strategy);

    let signing_key = match (&session.signing_key, &session.base_secret) {
        (Some(signing_key), _) => {
            let key = signing_key.expose_secret().as_bytes();
            if key.len() < MIN_SESSION_KEY_LEN {
                return Err(ConfigError::SessionKeyTooShort {
                    min: MIN_SESSION_KEY_LEN,
                    actual: key.len(),
                });
            }
            SecretSlice::from(key.to_vec())
        }
        (None, Some(base_secret)) => {
            let authenticator: &dyn MessageAuthenticator = match mac_strategy {
                MacStrategy::Ring => &RingHmacSha256,
                MacStrategy::Portable => &PortableHmacSha256,
            };
            let key = derive_key(
                authenticator,
                base_secret.expose_secret().as_bytes(),
                SESSION_KEY_DERIVATION_LABEL,
            );
            SecretSlice::from(key.to_vec())
        }
        (None, None) => return Err(ConfigError::MissingSessionSecret),
    };

    Ok(SessionCookieConfig {
        signing_key,
        mac_strategy,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
