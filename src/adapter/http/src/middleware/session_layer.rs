// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http_common::IntoApiError;
use internal_error::{InternalError, ResultIntoInternal};
use tollgate_accounts::{CurrentSession, SessionReconciler};
use tower::{Layer, Service};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Resolves the caller's session once per request and exposes it as
/// [`CurrentSession`] in a request-scoped catalog.
///
/// Expects the base [`dill::Catalog`] in the request extensions and replaces
/// it with the chained one.
#[derive(Debug, Clone)]
pub struct SessionLayer {}

impl SessionLayer {
    pub fn new() -> Self {
        Self {}
    }
}

impl<InnerSvc> Layer<InnerSvc> for SessionLayer {
    type Service = SessionMiddleware<InnerSvc>;

    fn layer(&self, inner: InnerSvc) -> Self::Service {
        SessionMiddleware { inner }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct SessionMiddleware<Svc> {
    inner: Svc,
}

impl<Svc> SessionMiddleware<Svc> {
    async fn resolve_session(
        base_catalog: &dill::Catalog,
        headers: &http::HeaderMap,
    ) -> Result<CurrentSession, InternalError> {
        let session_reconciler = base_catalog.get_one::<dyn SessionReconciler>().int_err()?;

        let session = session_reconciler.get_session(headers).await?;

        Ok(CurrentSession::from(session))
    }
}

impl<InnerSvc> Service<http::Request<Body>> for SessionMiddleware<InnerSvc>
where
    InnerSvc: Service<http::Request<Body>, Response = Response> + Send + Clone + 'static,
    InnerSvc::Error: Send,
    InnerSvc::Future: Send,
{
    type Response = InnerSvc::Response;
    type Error = InnerSvc::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(ctx)
    }

    fn call(&mut self, mut request: http::Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(base_catalog) = request.extensions().get::<dill::Catalog>().cloned() else {
                let e = InternalError::new(CatalogMissingError);
                return Ok(e.api_err().into_response());
            };

            let current_session =
                match Self::resolve_session(&base_catalog, request.headers()).await {
                    Ok(current_session) => current_session,
                    Err(e) => return Ok(e.api_err().into_response()),
                };

            tracing::debug!(
                user_id = current_session.user_id(),
                "Resolved request session"
            );

            let request_catalog = dill::CatalogBuilder::new_chained(&base_catalog)
                .add_value(current_session)
                .build();

            request.extensions_mut().insert(request_catalog);

            inner.call(request).await
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(thiserror::Error, Debug)]
#[error("Catalog not found in http server extensions")]
struct CatalogMissingError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
