// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};
use tollgate_accounts::{WalletAddress, WalletAddressConvertor};
use tollgate_entitlements::{ChainReadError, NftContractReader, TokenId};

use crate::{EvmRpcConfig, IERC721};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Reads the gating contract with plain `eth_call` requests.
///
/// Every call carries the configured timeout. Retries are left to the caller.
pub struct JsonRpcNftContractReader {
    client: reqwest::Client,
    config: Arc<EvmRpcConfig>,
    next_request_id: AtomicU64,
}

#[dill::component(pub)]
#[dill::interface(dyn NftContractReader)]
#[dill::scope(dill::Singleton)]
impl JsonRpcNftContractReader {
    pub fn new(config: Arc<EvmRpcConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            next_request_id: AtomicU64::new(1),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(method = method))]
    async fn eth_call<C: SolCall>(
        &self,
        method: &'static str,
        contract: &WalletAddress,
        call: &C,
    ) -> Result<C::Return, ChainReadError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_request_id.fetch_add(1, Ordering::Relaxed),
            method: "eth_call",
            params: (
                EthCallParams {
                    to: WalletAddressConvertor::lowercase_string(contract),
                    data: format!("0x{}", hex::encode(call.abi_encode())),
                },
                "latest",
            ),
        };

        let response = self
            .client
            .post(self.config.rpc_url.clone())
            .timeout(self.config.request_timeout)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| request_error(method, e))?;

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| request_error(method, e))?;

        if let Some(error) = body.error {
            tracing::debug!(code = error.code, message = %error.message, "eth_call failed");

            return Err(if error.is_revert() {
                ChainReadError::Reverted { method }
            } else {
                ChainReadError::Transport {
                    method,
                    reason: format!("RPC error {}: {}", error.code, error.message),
                }
            });
        }

        let Some(result) = body.result else {
            return Err(ChainReadError::Transport {
                method,
                reason: "response carries neither result nor error".to_string(),
            });
        };

        let data = hex::decode(result.trim_start_matches("0x")).map_err(|e| {
            ChainReadError::Transport {
                method,
                reason: format!("result is not hex: {e}"),
            }
        })?;

        // Calls to accounts without code, or into a missing function without a
        // fallback, come back empty
        if data.is_empty() {
            return Err(ChainReadError::Reverted { method });
        }

        C::abi_decode_returns(&data).map_err(|e| ChainReadError::Transport {
            method,
            reason: format!("undecodable return data: {e}"),
        })
    }
}

fn request_error(method: &'static str, e: reqwest::Error) -> ChainReadError {
    if e.is_timeout() {
        ChainReadError::Timeout { method }
    } else {
        // RPC URLs often embed API keys
        ChainReadError::Transport {
            method,
            reason: e.without_url().to_string(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl NftContractReader for JsonRpcNftContractReader {
    async fn balance_of(
        &self,
        contract: &WalletAddress,
        owner: &WalletAddress,
    ) -> Result<TokenId, ChainReadError> {
        self.eth_call(
            "balanceOf",
            contract,
            &IERC721::balanceOfCall { owner: *owner },
        )
        .await
    }

    async fn token_of_owner_by_index(
        &self,
        contract: &WalletAddress,
        owner: &WalletAddress,
        index: u64,
    ) -> Result<TokenId, ChainReadError> {
        self.eth_call(
            "tokenOfOwnerByIndex",
            contract,
            &IERC721::tokenOfOwnerByIndexCall {
                owner: *owner,
                index: TokenId::from(index),
            },
        )
        .await
    }

    async fn owner_of(
        &self,
        contract: &WalletAddress,
        token_id: TokenId,
    ) -> Result<WalletAddress, ChainReadError> {
        self.eth_call("ownerOf", contract, &IERC721::ownerOfCall { tokenId: token_id })
            .await
    }

    async fn token_uri(
        &self,
        contract: &WalletAddress,
        token_id: TokenId,
    ) -> Result<String, ChainReadError> {
        self.eth_call("tokenURI", contract, &IERC721::tokenURICall { tokenId: token_id })
            .await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (EthCallParams, &'static str),
}

#[derive(Debug, Serialize)]
struct EthCallParams {
    to: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

impl JsonRpcErrorObject {
    /// Geth reports reverts with code 3, other nodes only say so in the message
    fn is_revert(&self) -> bool {
        self.code == 3 || self.message.to_ascii_lowercase().contains("revert")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
