// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tollgate_accounts::{AccountID, WalletAddress, WalletAddressConvertor};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Claims carried by the wallet session cookie. Signed, not encrypted.
///
/// Timestamps are Unix seconds. Field order defines the byte layout of the
/// signed token and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookiePayload {
    pub subject_id: String,
    pub wallet_address: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl SessionCookiePayload {
    pub fn new(
        subject_id: &AccountID,
        wallet: &WalletAddress,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            wallet_address: WalletAddressConvertor::lowercase_string(wallet),
            issued_at: issued_at.timestamp(),
            expires_at: expires_at.timestamp(),
        }
    }

    pub fn issued_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.issued_at, 0)
    }

    pub fn expires_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    pub(crate) fn has_required_fields(&self) -> bool {
        !self.subject_id.trim().is_empty()
            && WalletAddressConvertor::parse(&self.wallet_address).is_ok()
    }
}
