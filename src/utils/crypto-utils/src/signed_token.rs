// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

use crate::MessageAuthenticator;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const SEGMENT_SEPARATOR: char = '.';

/// Frames `body` as `base64url(body) "." base64url(MAC(base64url(body)))`.
///
/// The MAC covers the encoded body, so verification never has to re-encode.
pub fn sign_token(authenticator: &dyn MessageAuthenticator, key: &[u8], body: &[u8]) -> String {
    let encoded_body = URL_SAFE_NO_PAD.encode(body);
    let tag = authenticator.sign(key, encoded_body.as_bytes());
    let encoded_tag = URL_SAFE_NO_PAD.encode(tag);

    format!("{encoded_body}{SEGMENT_SEPARATOR}{encoded_tag}")
}

/// Checks the framing and the tag, returning the decoded body
pub fn open_token(
    authenticator: &dyn MessageAuthenticator,
    key: &[u8],
    token: &str,
) -> Result<Vec<u8>, OpenTokenError> {
    let mut segments = token.split(SEGMENT_SEPARATOR);

    let (Some(encoded_body), Some(encoded_tag), None) =
        (segments.next(), segments.next(), segments.next())
    else {
        return Err(OpenTokenError::Malformed);
    };

    if encoded_body.is_empty() || encoded_tag.is_empty() {
        return Err(OpenTokenError::Malformed);
    }

    let tag = URL_SAFE_NO_PAD
        .decode(encoded_tag)
        .map_err(|_| OpenTokenError::BadEncoding)?;

    if !authenticator.verify(key, encoded_body.as_bytes(), &tag) {
        return Err(OpenTokenError::BadSignature);
    }

    URL_SAFE_NO_PAD
        .decode(encoded_body)
        .map_err(|_| OpenTokenError::BadEncoding)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OpenTokenError {
    #[error("Token must consist of exactly two segments")]
    Malformed,

    #[error("Token segment is not valid base64url")]
    BadEncoding,

    #[error("Token signature mismatch")]
    BadSignature,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
