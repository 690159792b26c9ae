// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::NormalizedSession;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Session of the caller of the current request
#[derive(Debug, Clone)]
pub enum CurrentSession {
    Authenticated(NormalizedSession),
    Anonymous(AnonymousSessionReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousSessionReason {
    NoAuthenticationProvided,
    AuthenticationInvalid,
}

impl CurrentSession {
    pub fn anonymous(reason: AnonymousSessionReason) -> Self {
        Self::Anonymous(reason)
    }

    pub fn authenticated(session: NormalizedSession) -> Self {
        Self::Authenticated(session)
    }

    pub fn session(&self) -> Option<&NormalizedSession> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Anonymous(_) => None,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session().map(NormalizedSession::user_id)
    }
}

impl From<Option<NormalizedSession>> for CurrentSession {
    fn from(value: Option<NormalizedSession>) -> Self {
        match value {
            Some(session) => Self::Authenticated(session),
            None => Self::Anonymous(AnonymousSessionReason::NoAuthenticationProvided),
        }
    }
}
