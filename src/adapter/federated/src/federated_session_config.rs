// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::time::Duration;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_FEDERATED_REQUEST_TIMEOUT_MILLIS: u64 = 3_000;

#[derive(Debug, Clone)]
pub struct FederatedSessionConfig {
    /// Provider endpoint answering with the session of the forwarded
    /// credentials, or `null`
    pub session_url: url::Url,
    pub request_timeout: Duration,
    /// Cookies of this gateway that must never reach the provider
    pub withheld_cookies: Vec<String>,
}

impl FederatedSessionConfig {
    pub fn new(session_url: url::Url) -> Self {
        Self {
            session_url,
            request_timeout: Duration::from_millis(DEFAULT_FEDERATED_REQUEST_TIMEOUT_MILLIS),
            withheld_cookies: Vec::new(),
        }
    }

    pub fn with_withheld_cookie(mut self, name: impl Into<String>) -> Self {
        self.withheld_cookies.push(name.into());
        self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
