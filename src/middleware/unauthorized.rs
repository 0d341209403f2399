//! Unauthorized propagation.
//!
//! A credential can pass the gateway check and still be refused by the
//! upstream's own auth boundary (e.g. it expired in between). The upstream's
//! `401` is rewritten to the gateway's own 401 contract: status only, empty
//! body, no upstream headers. Everything else passes through untouched.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Run `normalize_unauthorized` after every proxied call of `router`.
pub fn apply(router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::map_response(normalize_unauthorized))
}

pub async fn normalize_unauthorized(response: Response) -> Response {
    if response.status() != StatusCode::UNAUTHORIZED {
        return response;
    }

    tracing::warn!("upstream rejected credential, answering 401");
    StatusCode::UNAUTHORIZED.into_response()
}
