/*
 * Responsibility
 * - terminal handler of every proxied route: forward to the route's upstream
 * - transport failures -> AppError (502); upstream statuses are relayed as-is
 */
use std::sync::Arc;

use axum::{
    Extension,
    body::Body,
    extract::State,
    http::{Request, Uri},
    response::Response,
};

use crate::{error::AppError, services::proxy::Route, state::AppState};

pub async fn forward(
    State(state): State<AppState>,
    Extension(route): Extension<Arc<Route>>,
    req: Request<Body>,
) -> Result<Response, AppError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = state.proxy.forward(&route, req).await.map_err(|err| {
        tracing::error!(
            route = route.name(),
            upstream = %route.upstream(),
            method = %method,
            path = %path,
            error = %err,
            "proxy call failed"
        );
        AppError::from(err)
    })?;

    tracing::debug!(
        route = route.name(),
        status = response.status().as_u16(),
        "upstream responded"
    );

    Ok(response)
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        path: uri.path().to_string(),
    }
}
