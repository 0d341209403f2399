//! HTTP-level middleware (cross-cutting concerns).
//!
//! Applies to every route of the gateway, proxied or local.
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id), forwarded upstream too
//! - Access logging / request tracing (TraceLayer)
//! - Body size limits
//! - Global timeout (bounds the whole request including the upstream call)

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Apply HTTP-level middleware to the given Router.
///
/// Limits come from `Config`:
/// - body limit: `REQUEST_BODY_LIMIT_BYTES`
/// - timeout: `UPSTREAM_TIMEOUT_SECS` plus the authority budget, so the outer
///   timer never fires before the inner clients give up on their own
pub fn apply(router: Router, config: &Config) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let request_timeout = config.upstream_timeout + config.auth_validate_timeout;

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        // Generate a request id if missing (set before the proxy copies headers upstream).
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(config.request_body_limit))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
