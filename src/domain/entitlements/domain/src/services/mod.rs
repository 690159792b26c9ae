// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod entitlement_resolver;
mod entitlement_service;
mod entitlement_sync_service;
mod nft_contract_reader;
mod tier_guard;

pub use entitlement_resolver::*;
pub use entitlement_service::*;
pub use entitlement_sync_service::*;
pub use nft_contract_reader::*;
pub use tier_guard::*;
