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

pub const DEFAULT_RPC_REQUEST_TIMEOUT_MILLIS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct EvmRpcConfig {
    /// JSON-RPC endpoint of the chain holding the gating contract
    pub rpc_url: url::Url,
    /// Upper bound for a single `eth_call`
    pub request_timeout: Duration,
}

impl EvmRpcConfig {
    pub fn new(rpc_url: url::Url) -> Self {
        Self {
            rpc_url,
            request_timeout: Duration::from_millis(DEFAULT_RPC_REQUEST_TIMEOUT_MILLIS),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
