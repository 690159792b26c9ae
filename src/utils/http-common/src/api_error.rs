// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tollgate_auth_web3::HandshakeError;
use tollgate_entitlements::{GuardDenied, ResolveEntitlementError, SyncEntitlementError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// This type is used to simplify error handling in HTTP handlers and unify
/// logging of API errors.
///
/// The typical usage pattern is:
///
/// ```
/// async fn handler() -> Result<(), ApiError> {
///     operation().await.api_err()?;
///     Ok(())
/// }
/// ```
///
/// A conversion between the domain error and [`ApiError`] has to exist. We
/// avoid [From] and [Into] on purpose and use [`IntoApiError`] instead, so that
/// putting a question mark on a fallible operation is always an explicit
/// decision about the resulting status code.
///
/// Authentication failures of any kind collapse into one generic `401`
/// response. The specific cause is logged and never returned to the client.
#[derive(Debug, Error)]
#[error("api error {status_code:?}")]
pub struct ApiError {
    pub status_code: http::StatusCode,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
    /// Replaces the source message in the response body
    public_message: Option<&'static str>,
}

impl ApiError {
    pub fn new(
        source: impl std::error::Error + Send + Sync + 'static,
        status_code: http::StatusCode,
    ) -> Self {
        Self {
            status_code,
            source: source.into(),
            public_message: None,
        }
    }

    pub fn new_unauthorized() -> Self {
        Self {
            status_code: http::StatusCode::UNAUTHORIZED,
            source: UNAUTHORIZED_MESSAGE.into(),
            public_message: None,
        }
    }

    /// Generic `401` that keeps the real cause for the logs only
    pub fn new_unauthorized_from(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            status_code: http::StatusCode::UNAUTHORIZED,
            source: source.into(),
            public_message: Some(UNAUTHORIZED_MESSAGE),
        }
    }

    pub fn forbidden(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::FORBIDDEN)
    }

    pub fn bad_request(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::BAD_REQUEST)
    }

    pub fn not_found(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::NOT_FOUND)
    }

    pub fn not_found_without_reason() -> Self {
        Self {
            status_code: http::StatusCode::NOT_FOUND,
            source: "Not Found".into(),
            public_message: None,
        }
    }
}

impl From<InternalError> for ApiError {
    fn from(e: InternalError) -> Self {
        e.api_err()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorResponse {
    pub message: String,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.status_code == http::StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error = ?self.source,
                error_msg = %self.source,
                status_code = %self.status_code,
                "Internal API error",
            );
            (self.status_code, "").into_response()
        } else {
            tracing::warn!(
                error = ?self.source,
                error_msg = %self.source,
                status_code = %self.status_code,
                "API error",
            );

            let message = match self.public_message {
                Some(message) => message.to_string(),
                None => self.source.to_string(),
            };
            let response_body = axum::response::Json(ApiErrorResponse { message });

            (self.status_code, response_body).into_response()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Provides explicit conversion into [`ApiError`].
pub trait IntoApiError {
    fn api_err(self) -> ApiError;
}

/// Allows using `.api_err()` method on [Result] types.
pub trait ResultIntoApiError<K, E>
where
    E: IntoApiError,
{
    fn api_err(self) -> Result<K, ApiError>;
}

impl<K, E> ResultIntoApiError<K, E> for Result<K, E>
where
    E: IntoApiError,
{
    fn api_err(self) -> Result<K, ApiError> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.api_err()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

enum ApiErrorCategory<'a> {
    Unauthenticated,
    Forbidden,
    Conflict,
    Internal(&'a InternalError),
    Other,
}

/// Categorizes an error into a broad group that decides the status code
/// regardless of the handler it surfaced in.
trait ApiErrorCategorizable {
    fn categorize(&self) -> ApiErrorCategory<'_>;
}

impl<E> IntoApiError for E
where
    E: ApiErrorCategorizable,
    E: std::error::Error + Send + Sync + 'static,
{
    fn api_err(self) -> ApiError {
        match self.categorize() {
            ApiErrorCategory::Unauthenticated => ApiError::new_unauthorized_from(self),
            ApiErrorCategory::Forbidden => ApiError::forbidden(self),
            ApiErrorCategory::Conflict => ApiError::new(self, http::StatusCode::CONFLICT),
            ApiErrorCategory::Internal(_) | ApiErrorCategory::Other => {
                ApiError::new(self, http::StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl ApiErrorCategorizable for InternalError {
    fn categorize(&self) -> ApiErrorCategory<'_> {
        ApiErrorCategory::Internal(self)
    }
}

impl ApiErrorCategorizable for HandshakeError {
    fn categorize(&self) -> ApiErrorCategory<'_> {
        match self {
            Self::MalformedMessage { .. }
            | Self::InvalidSignature
            | Self::DomainMismatch { .. }
            | Self::ChainMismatch { .. }
            | Self::MessageExpired
            | Self::NonceReplay => ApiErrorCategory::Unauthenticated,
            Self::Internal(e) => ApiErrorCategory::Internal(e),
        }
    }
}

impl ApiErrorCategorizable for GuardDenied {
    fn categorize(&self) -> ApiErrorCategory<'_> {
        if self.is_unauthorized() {
            ApiErrorCategory::Unauthenticated
        } else {
            ApiErrorCategory::Forbidden
        }
    }
}

impl ApiErrorCategorizable for ResolveEntitlementError {
    fn categorize(&self) -> ApiErrorCategory<'_> {
        match self {
            // Misconfiguration fails closed
            Self::Configuration(_) => ApiErrorCategory::Other,
            Self::VerificationFailed(_) => ApiErrorCategory::Forbidden,
            Self::Internal(e) => ApiErrorCategory::Internal(e),
        }
    }
}

impl ApiErrorCategorizable for SyncEntitlementError {
    fn categorize(&self) -> ApiErrorCategory<'_> {
        match self {
            Self::Resolve(e) => e.categorize(),
            Self::WalletConflict(_) => ApiErrorCategory::Conflict,
            Self::Internal(e) => ApiErrorCategory::Internal(e),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
