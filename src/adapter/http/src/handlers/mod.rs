// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod entitlement_handlers;
mod session_handler;
mod web3_auth_handlers;

pub use entitlement_handlers::*;
pub use session_handler::*;
pub use web3_auth_handlers::*;
