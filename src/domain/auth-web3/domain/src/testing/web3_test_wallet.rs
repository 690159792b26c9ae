// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use tollgate_accounts::{WalletAddress, WalletAddressConvertor};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Parameters of an EIP-4361 message; defaults describe a valid sign-in to
/// `localhost:8080` on mainnet
#[derive(Debug, Clone)]
pub struct SiweMessageParams {
    pub domain: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: DateTime<Utc>,
    pub expiration_time: Option<DateTime<Utc>>,
    pub not_before: Option<DateTime<Utc>>,
}

impl SiweMessageParams {
    pub fn new(nonce: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            domain: "localhost:8080".to_string(),
            chain_id: 1,
            nonce: nonce.into(),
            issued_at,
            expiration_time: None,
            not_before: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Deterministic secp256k1 wallet producing real EIP-191 signatures
pub struct Web3TestWallet {
    signing_key: SigningKey,
    address: WalletAddress,
}

impl Web3TestWallet {
    /// `seed` must be non-zero
    pub fn from_seed(seed: u8) -> Self {
        let signing_key = SigningKey::from_slice(&[seed; 32]).expect("Invalid test wallet seed");

        let public_key = k256::PublicKey::from(signing_key.verifying_key()).to_encoded_point(false);
        let hash = alloy_primitives::keccak256(&public_key.as_bytes()[1..]);
        let address = WalletAddress::from_slice(&hash[12..]);

        Self {
            signing_key,
            address,
        }
    }

    pub fn address(&self) -> WalletAddress {
        self.address
    }

    pub fn address_lowercase(&self) -> String {
        WalletAddressConvertor::lowercase_string(&self.address)
    }

    /// Canonical message text, as the verifier will re-serialize it
    pub fn siwe_message(&self, params: &SiweMessageParams) -> String {
        let mut text = format!(
            "{domain} wants you to sign in with your Ethereum account:\n\
             {address}\n\
             \n\
             Sign in to Tollgate\n\
             \n\
             URI: http://{domain}\n\
             Version: 1\n\
             Chain ID: {chain_id}\n\
             Nonce: {nonce}\n\
             Issued At: {issued_at}",
            domain = params.domain,
            address = WalletAddressConvertor::checksummed_string(&self.address),
            chain_id = params.chain_id,
            nonce = params.nonce,
            issued_at = Self::timestamp(params.issued_at),
        );

        if let Some(expiration_time) = params.expiration_time {
            text.push_str(&format!(
                "\nExpiration Time: {}",
                Self::timestamp(expiration_time)
            ));
        }
        if let Some(not_before) = params.not_before {
            text.push_str(&format!("\nNot Before: {}", Self::timestamp(not_before)));
        }

        siwe::Message::from_str(&text)
            .expect("Invalid test message")
            .to_string()
    }

    /// EIP-191 personal signature, `0x`-prefixed hex of `r || s || v`
    pub fn sign(&self, message: &str) -> String {
        let hash = alloy_primitives::eip191_hash_message(message.as_bytes());

        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash.as_slice())
            .expect("Signing failed");

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() + 27);

        format!("0x{}", alloy_primitives::hex::encode(bytes))
    }

    fn timestamp(t: DateTime<Utc>) -> String {
        t.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
