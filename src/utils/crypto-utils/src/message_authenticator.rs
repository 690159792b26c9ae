// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use hmac::Mac;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const MAC_TAG_LEN: usize = 32;

pub type MacTag = [u8; MAC_TAG_LEN];

/// HMAC-SHA256 over raw bytes.
///
/// Implementations must be byte-for-byte interchangeable: a tag produced by
/// one strategy verifies with any other. `verify` compares in constant time.
pub trait MessageAuthenticator: Send + Sync {
    fn sign(&self, key: &[u8], message: &[u8]) -> MacTag;

    fn verify(&self, key: &[u8], message: &[u8], tag: &[u8]) -> bool;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Derives a purpose-bound key from a base secret: `HMAC(base_secret, label)`
pub fn derive_key(
    authenticator: &dyn MessageAuthenticator,
    base_secret: &[u8],
    label: &str,
) -> MacTag {
    authenticator.sign(base_secret, label.as_bytes())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Ring
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(feature = "ring")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RingHmacSha256;

#[cfg(feature = "ring")]
impl MessageAuthenticator for RingHmacSha256 {
    fn sign(&self, key: &[u8], message: &[u8]) -> MacTag {
        let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key);
        let tag = ring::hmac::sign(&key, message);

        let mut res = [0u8; MAC_TAG_LEN];
        res.copy_from_slice(tag.as_ref());
        res
    }

    fn verify(&self, key: &[u8], message: &[u8], tag: &[u8]) -> bool {
        let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key);
        ring::hmac::verify(&key, message, tag).is_ok()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Portable
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

type HmacSha256 = hmac::Hmac<sha2::Sha256>;

/// Pure-Rust strategy for runtimes where only a generic MAC primitive is
/// available
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableHmacSha256;

impl PortableHmacSha256 {
    fn keyed(key: &[u8]) -> HmacSha256 {
        // HMAC is defined for keys of any length
        HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length")
    }
}

impl MessageAuthenticator for PortableHmacSha256 {
    fn sign(&self, key: &[u8], message: &[u8]) -> MacTag {
        let mut mac = Self::keyed(key);
        mac.update(message);
        mac.finalize().into_bytes().into()
    }

    fn verify(&self, key: &[u8], message: &[u8], tag: &[u8]) -> bool {
        let mut mac = Self::keyed(key);
        mac.update(message);
        mac.verify_slice(tag).is_ok()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
