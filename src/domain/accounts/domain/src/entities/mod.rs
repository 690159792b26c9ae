// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod account;
mod current_session;
mod normalized_session;
mod wallet_address;

pub use account::*;
pub use current_session::*;
pub use normalized_session::*;
pub use wallet_address::*;
