// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Duration, Utc};

use crate::{NormalizedSession, SessionInfo, SessionUser};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Session as a federated provider would return it
pub fn federated_session(user_id: &str, now: DateTime<Utc>) -> NormalizedSession {
    NormalizedSession {
        user: SessionUser {
            id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            name: user_id.to_string(),
            image: None,
            email_verified: true,
        },
        session: SessionInfo {
            id: format!("session-{user_id}"),
            user_id: user_id.to_string(),
            expires_at: now + Duration::days(7),
            token: format!("provider-token-{user_id}"),
            created_at: now,
            updated_at: now,
            active_organization_id: None,
        },
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
