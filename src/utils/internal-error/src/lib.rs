// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::backtrace::Backtrace;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Infrastructure failure that callers are not expected to handle beyond
/// propagating it (store unreachable, malformed row, transport failure).
///
/// Domain errors keep an `Internal(InternalError)` variant next to their
/// meaningful variants, so matching stays exhaustive.
#[derive(Error, Debug)]
#[error("Internal error")]
pub struct InternalError {
    #[source]
    source: BoxedError,
    context: Option<String>,
    // Boxed: a bare `Backtrace` field makes the derive emit a nightly-only `provide()`
    captured_backtrace: Box<Backtrace>,
}

impl InternalError {
    pub fn new<E: Into<BoxedError>>(e: E) -> Self {
        Self {
            source: e.into(),
            context: None,
            captured_backtrace: Box::new(Backtrace::capture()),
        }
    }

    pub fn bail<T>(reason: impl Into<String>) -> Result<T, Self> {
        Err(Self::new(InternalErrorBail::new(reason)))
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Human-readable description including the wrapped cause
    pub fn reason(&self) -> String {
        match &self.context {
            Some(context) => format!("{self}: {} (context: {context})", self.source),
            None => format!("{self}: {}", self.source),
        }
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.captured_backtrace
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("{reason}")]
struct InternalErrorBail {
    reason: String,
}

impl InternalErrorBail {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub trait ErrorIntoInternal {
    fn int_err(self) -> InternalError;
}

impl<E> ErrorIntoInternal for E
where
    E: Into<BoxedError>,
{
    fn int_err(self) -> InternalError {
        InternalError::new(self)
    }
}

pub trait ResultIntoInternal<OK> {
    fn int_err(self) -> Result<OK, InternalError>;

    fn context_int_err(self, context: impl Into<String>) -> Result<OK, InternalError>;
}

impl<OK, E> ResultIntoInternal<OK> for Result<OK, E>
where
    E: Into<BoxedError>,
{
    fn int_err(self) -> Result<OK, InternalError> {
        match self {
            Ok(ok) => Ok(ok),
            Err(e) => Err(e.int_err()),
        }
    }

    fn context_int_err(self, context: impl Into<String>) -> Result<OK, InternalError> {
        match self {
            Ok(ok) => Ok(ok),
            Err(e) => Err(e.int_err().with_context(context)),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
