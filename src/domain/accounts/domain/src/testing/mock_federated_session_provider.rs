// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::{ErrorIntoInternal, InternalError};

use crate::{FederatedSessionProvider, NormalizedSession};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

mockall::mock! {
    pub FederatedSessionProvider {}

    #[async_trait::async_trait]
    impl FederatedSessionProvider for FederatedSessionProvider {
        async fn get_session(
            &self,
            headers: &http::HeaderMap,
        ) -> Result<Option<NormalizedSession>, InternalError>;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl MockFederatedSessionProvider {
    pub fn returning_session(session: Option<NormalizedSession>) -> Self {
        let mut mock = Self::new();
        mock.expect_get_session()
            .returning(move |_| Ok(session.clone()));
        mock
    }

    pub fn unreachable() -> Self {
        let mut mock = Self::new();
        mock.expect_get_session()
            .returning(|_| Err(std::io::Error::other("connection refused").int_err()));
        mock
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
