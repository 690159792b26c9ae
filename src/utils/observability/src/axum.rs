// Copyright Tollgate developers and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Request span that carries the method and path only.
///
/// Headers are never recorded: they carry session cookies.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpRequestSpan;

impl<B> MakeSpan<B> for HttpRequestSpan {
    fn make_span(&mut self, request: &http::Request<B>) -> tracing::Span {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

pub fn http_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, HttpRequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(HttpRequestSpan)
        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO))
}
