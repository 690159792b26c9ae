// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::CatalogBuilder;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Registers account services. A [`tollgate_accounts::FederatedSessionProvider`]
/// and an account repository must be registered separately.
pub fn register_dependencies(b: &mut CatalogBuilder) {
    b.add::<AccountServiceImpl>();
    b.add::<SessionReconcilerImpl>();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
