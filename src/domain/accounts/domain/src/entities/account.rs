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

use crate::{WalletAddress, WalletAddressConvertor};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const PROVIDER_WEB3_WALLET: &str = "web3-wallet";

/// Reserved TLD, never deliverable
pub const SYNTHETIC_EMAIL_DOMAIN: &str = "wallet.invalid";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[nutype::nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128),
    derive(
        AsRef,
        Clone,
        Debug,
        Display,
        Eq,
        PartialEq,
        Hash,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct AccountID(String);

impl AccountID {
    pub fn new_generated() -> Self {
        Self::try_new(uuid::Uuid::new_v4().to_string()).expect("Invalid account ID generated")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Wallet-identified user
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountID,
    pub display_name: String,
    pub email: String,
    pub email_verified: bool,
    pub avatar_url: Option<String>,
    pub wallet_address: WalletAddress,
    pub provider: String,
    pub active_organization_id: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new_wallet_account(id: AccountID, wallet: &WalletAddress, now: DateTime<Utc>) -> Self {
        Self {
            id,
            display_name: WalletAddressConvertor::abbreviated(wallet),
            email: Self::synthetic_email(wallet),
            email_verified: false,
            avatar_url: None,
            wallet_address: *wallet,
            provider: PROVIDER_WEB3_WALLET.to_string(),
            active_organization_id: None,
            registered_at: now,
            updated_at: now,
        }
    }

    pub fn synthetic_email(wallet: &WalletAddress) -> String {
        format!(
            "{}@{SYNTHETIC_EMAIL_DOMAIN}",
            WalletAddressConvertor::lowercase_string(wallet)
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
