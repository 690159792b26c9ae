// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Behavior switches of the HTTP boundary
#[derive(Debug, Clone, Default)]
pub struct HttpAuthConfig {
    /// Re-verify on-chain ownership right after a successful wallet login.
    /// A failed synchronization is logged and never fails the login.
    pub sync_entitlements_on_login: bool,
}
