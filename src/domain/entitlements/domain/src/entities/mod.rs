// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod entitlement_record;
mod entitlements_config;
mod ownership_resolution;
mod resources;
mod tier;

pub use entitlement_record::*;
pub use entitlements_config::*;
pub use ownership_resolution::*;
pub use resources::*;
pub use tier::*;
