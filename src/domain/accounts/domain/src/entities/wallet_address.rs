// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type WalletAddress = alloy_primitives::Address;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct WalletAddressConvertor;

impl WalletAddressConvertor {
    /// Canonical storage and cookie form: `0x` followed by 40 lowercase hex
    /// digits
    pub fn lowercase_string(wallet: &WalletAddress) -> String {
        format!("0x{}", hex::encode(wallet.as_slice()))
    }

    pub fn checksummed_string(wallet: &WalletAddress) -> String {
        wallet.to_checksum(None)
    }

    /// Accepts any letter case, checksum is not enforced
    pub fn parse(value: &str) -> Result<WalletAddress, ParseWalletAddressError> {
        WalletAddress::from_str(value.trim()).map_err(|_| ParseWalletAddressError {
            value: value.to_string(),
        })
    }

    /// Short human-readable form: `0x1234…abcd`
    pub fn abbreviated(wallet: &WalletAddress) -> String {
        let full = Self::lowercase_string(wallet);
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid wallet address: '{value}'")]
pub struct ParseWalletAddressError {
    pub value: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
