// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::CatalogBuilder;
use tollgate_auth_web3::NonceProtectionMode;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// In [`NonceProtectionMode::Enforced`] mode a
/// [`tollgate_auth_web3::Web3AuthNonceRepository`] must be registered as well
pub fn register_dependencies(b: &mut CatalogBuilder, nonce_protection: NonceProtectionMode) {
    match nonce_protection {
        NonceProtectionMode::Enforced => {
            b.add::<Web3NonceServiceImpl>();
        }
        NonceProtectionMode::Degraded => {
            b.add::<DegradedWeb3NonceService>();
        }
    }

    b.add::<Web3HandshakeVerifierImpl>();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
