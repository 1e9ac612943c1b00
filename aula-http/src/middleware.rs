use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{Span, debug, error, info_span, warn};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    response::Response,
};

const TARGET_HTTP: &str = "Aula-Http";

pub fn tower_trace(routes: Router) -> Router {
    routes.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                info_span!(
                    "http_request",
                    method = ?request.method(),
                    matched_path,
                    status = tracing::field::Empty,
                )
            })
            .on_request(|request: &Request<_>, _span: &Span| {
                debug!(
                    TARGET_HTTP,
                    "New request: {} {}",
                    request.method(),
                    request.uri().path()
                )
            })
            .on_response(|response: &Response, latency: Duration, span: &Span| {
                let status = response.status();
                span.record("status", status.as_u16());
                if status.is_client_error() {
                    warn!(TARGET_HTTP, "Rejected with {} in {:?}", status, latency)
                } else {
                    debug!(TARGET_HTTP, "Response {} generated in {:?}", status, latency)
                }
            })
            .on_failure(
                |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                    error!(
                        TARGET_HTTP,
                        "Something went wrong {} in {:?}",
                        error.to_string(),
                        latency
                    )
                },
            ),
    )
}
