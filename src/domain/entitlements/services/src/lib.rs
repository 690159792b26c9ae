// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod dependencies;
mod entitlement_resolver_impl;
mod entitlement_service_impl;
mod entitlement_sync_service_impl;
mod tier_guard;

pub use dependencies::*;
pub use entitlement_resolver_impl::*;
pub use entitlement_service_impl::*;
pub use entitlement_sync_service_impl::*;
pub use tier_guard::*;
