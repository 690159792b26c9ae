// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod account_service_impl;
mod dependencies;
mod no_federated_session_provider;
mod session_reconciler_impl;

pub use account_service_impl::*;
pub use dependencies::*;
pub use no_federated_session_provider::*;
pub use session_reconciler_impl::*;
