// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;
use std::sync::Arc;

use internal_error::{InternalError, ResultIntoInternal};
use time_source::SystemTimeSource;
use tollgate_accounts::{AccountService, WalletAddress, WalletAddressConvertor};
use tollgate_auth_web3::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const SIGNATURE_LEN: usize = 65;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct Web3HandshakeVerifierImpl {
    nonce_service: Arc<dyn Web3NonceService>,
    account_service: Arc<dyn AccountService>,
    cookie_codec: Arc<SessionCookieCodec>,
    config: Arc<Web3AuthConfig>,
    time_source: Arc<dyn SystemTimeSource>,
}

#[dill::component(pub)]
#[dill::interface(dyn Web3HandshakeVerifier)]
impl Web3HandshakeVerifierImpl {
    pub fn new(
        nonce_service: Arc<dyn Web3NonceService>,
        account_service: Arc<dyn AccountService>,
        cookie_codec: Arc<SessionCookieCodec>,
        config: Arc<Web3AuthConfig>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            nonce_service,
            account_service,
            cookie_codec,
            config,
            time_source,
        }
    }

    /// Checks that involve neither the nonce store nor the account store
    fn validate_message(
        &self,
        request: &HandshakeRequest,
    ) -> Result<(siwe::Message, WalletAddress), HandshakeError> {
        let message = siwe::Message::from_str(&request.message).map_err(|e| {
            HandshakeError::MalformedMessage {
                reason: e.to_string(),
            }
        })?;

        let signature = decode_signature(&request.signature)
            .ok_or(HandshakeError::InvalidSignature)?;
        message
            .verify_eip191(&signature)
            .map_err(|_| HandshakeError::InvalidSignature)?;

        let message_domain = message.domain.as_str();
        if !message_domain.eq_ignore_ascii_case(request.request_host.trim()) {
            return Err(HandshakeError::DomainMismatch {
                message_domain: message_domain.to_string(),
                request_host: request.request_host.clone(),
            });
        }

        if let Some(expected) = self.config.expected_chain_id {
            if message.chain_id != expected {
                return Err(HandshakeError::ChainMismatch {
                    expected,
                    actual: message.chain_id,
                });
            }
        }

        let now = time::OffsetDateTime::from_unix_timestamp(self.time_source.now().timestamp())
            .int_err()?;
        if !message.valid_at(&now) || *message.issued_at.as_ref() > now {
            return Err(HandshakeError::MessageExpired);
        }

        let wallet = WalletAddress::from(message.address);

        Ok((message, wallet))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl Web3HandshakeVerifier for Web3HandshakeVerifierImpl {
    #[tracing::instrument(level = "debug", skip_all, fields(request_host = %request.request_host))]
    async fn verify(&self, request: HandshakeRequest) -> Result<HandshakeOutcome, HandshakeError> {
        let (message, wallet) = match self.validate_message(&request) {
            Ok(validated) => validated,
            Err(err) => {
                tracing::warn!(error = %err, "Wallet sign-in rejected");
                return Err(err);
            }
        };

        if !self.nonce_service.consume_nonce(&message.nonce).await? {
            tracing::warn!(
                wallet = %WalletAddressConvertor::lowercase_string(&wallet),
                "Wallet sign-in rejected: nonce replayed or expired"
            );
            return Err(HandshakeError::NonceReplay);
        }

        let account = self.account_service.upsert_wallet_account(&wallet).await?;

        let issued_at = self.time_source.now();
        let payload = SessionCookiePayload::new(
            &account.id,
            &wallet,
            issued_at,
            issued_at + self.config.session_ttl,
        );
        let token = self.cookie_codec.sign(&payload)?;

        tracing::info!(
            account_id = %account.id,
            wallet = %payload.wallet_address,
            "Wallet sign-in succeeded"
        );

        Ok(HandshakeOutcome {
            account,
            payload,
            token,
            cookie: SessionCookieAttributes::from_config(&self.config),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn decode_signature(signature: &str) -> Option<[u8; SIGNATURE_LEN]> {
    let signature = signature.trim();
    let hex_digits = signature.strip_prefix("0x").unwrap_or(signature);

    hex::decode(hex_digits).ok()?.try_into().ok()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
