// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod account_service;
mod federated_session_provider;
mod session_reconciler;

pub use account_service::*;
pub use federated_session_provider::*;
pub use session_reconciler::*;
