// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod fake_nft_contract;
mod mock_entitlement_resolver;

pub use fake_nft_contract::*;
pub use mock_entitlement_resolver::*;
