// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Duration;
use secrecy::SecretSlice;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_NONCE_TTL_SECONDS: i64 = 300;
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "siwe_session";

/// Domain-separation label for deriving the cookie key from a base secret
pub const SESSION_KEY_DERIVATION_LABEL: &str = "tollgate/session-cookie/v1";

pub const MIN_SESSION_KEY_LEN: usize = 32;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct Web3AuthConfig {
    pub nonce_ttl: Duration,
    pub session_ttl: Duration,
    /// When set, signed messages must name this chain
    pub expected_chain_id: Option<u64>,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl Default for Web3AuthConfig {
    fn default() -> Self {
        Self {
            nonce_ttl: Duration::seconds(DEFAULT_NONCE_TTL_SECONDS),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECONDS),
            expected_chain_id: None,
            cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            cookie_secure: true,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MacStrategy {
    #[default]
    Ring,
    Portable,
}

/// Signing key of the session cookie, at least [`MIN_SESSION_KEY_LEN`] bytes
#[derive(Debug)]
pub struct SessionCookieConfig {
    pub signing_key: SecretSlice<u8>,
    pub mac_strategy: MacStrategy,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Attributes the session cookie must be set with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookieAttributes {
    pub name: String,
    pub max_age: Duration,
    pub http_only: bool,
    pub secure: bool,
    pub same_site_lax: bool,
    pub path: String,
}

impl SessionCookieAttributes {
    pub fn from_config(config: &Web3AuthConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            max_age: config.session_ttl,
            http_only: true,
            secure: config.cookie_secure,
            same_site_lax: true,
            path: "/".to_string(),
        }
    }
}
