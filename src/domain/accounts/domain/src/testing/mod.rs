// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod mock_account_service;
mod mock_federated_session_provider;
mod session_fixtures;

pub use mock_account_service::*;
pub use mock_federated_session_provider::*;
pub use session_fixtures::*;
