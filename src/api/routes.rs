/*
 * Responsibility
 * - URL structure of the gateway
 * - one sub-router per upstream route: `{prefix}` and `{prefix}/{*rest}`
 * - filter chain per route: [authorization filter] -> unauthorized normalization -> forward
 */
use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{any, get},
};

use crate::api::handlers::{
    health::health,
    proxy::{forward, not_found},
};
use crate::middleware::{auth::access, unauthorized};
use crate::services::proxy::Route;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let mut router = Router::new().route("/health", get(health));

    for route in state.routes.iter() {
        router = router.merge(upstream_routes(route.clone(), state));
    }

    router.fallback(not_found)
}

fn upstream_routes(route: Arc<Route>, state: &AppState) -> Router<AppState> {
    let prefix = route.prefix().to_string();

    let router = Router::new()
        .route(&prefix, any(forward))
        .route(&format!("{prefix}/{{*rest}}"), any(forward));

    // Layers added later wrap earlier ones: the filter runs first and the
    // normalization only ever sees responses of calls that were forwarded.
    let router = unauthorized::apply(router);
    let router = if route.requires_auth() {
        access::apply(router, state.clone())
    } else {
        router
    };

    router.layer(Extension(route))
}
