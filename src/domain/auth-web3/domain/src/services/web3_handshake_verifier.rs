// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;
use tollgate_accounts::Account;

use crate::{SessionCookieAttributes, SessionCookiePayload};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct HandshakeRequest {
    /// EIP-4361 message text as signed by the wallet
    pub message: String,
    /// 65-byte signature, hex encoded with an optional `0x` prefix
    pub signature: String,
    /// Host the request was addressed to, compared with the message domain
    pub request_host: String,
}

/// Everything the caller needs to establish the session. Returned by value:
/// nothing is kept between the handshake and cookie issuance.
#[derive(Debug, Clone)]
pub struct HandshakeOutcome {
    pub account: Account,
    pub payload: SessionCookiePayload,
    pub token: String,
    pub cookie: SessionCookieAttributes,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait Web3HandshakeVerifier: Send + Sync {
    /// Validates a signed challenge and mints a wallet session.
    ///
    /// Consumes at most one nonce, upserts at most one account and never
    /// touches the chain.
    async fn verify(&self, request: HandshakeRequest) -> Result<HandshakeOutcome, HandshakeError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum HandshakeError {
    #[error("Malformed EIP-4361 message: {reason}")]
    MalformedMessage { reason: String },

    #[error("Signature does not match the message address")]
    InvalidSignature,

    #[error("Message domain '{message_domain}' does not match request host '{request_host}'")]
    DomainMismatch {
        message_domain: String,
        request_host: String,
    },

    #[error("Message chain {actual} does not match expected chain {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("Message is outside of its validity window")]
    MessageExpired,

    #[error("Nonce was already used or has expired")]
    NonceReplay,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
