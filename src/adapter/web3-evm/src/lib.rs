// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod erc721;
mod evm_rpc_config;
mod json_rpc_nft_contract_reader;

pub use erc721::IERC721;
pub use evm_rpc_config::*;
pub use json_rpc_nft_contract_reader::*;
