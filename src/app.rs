/*
 * Responsibility
 * - load Config -> build process-wide clients -> assemble Router
 * - apply HTTP middleware (request id / trace / limits / timeout)
 * - start with axum::serve()
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;
use crate::services::{auth::build_authority, proxy::ServiceClient, proxy::build_routes};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,api_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing so they are not lost with stderr.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it is noticed immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState, AppError> {
    // Process-wide clients: created once, shared by every request task.
    let authority = build_authority(config)?;
    let proxy = ServiceClient::new(config.upstream_timeout).map_err(|err| {
        tracing::error!(error = %err, "failed to build upstream client");
        AppError::Internal
    })?;

    let routes = build_routes(config);
    for route in &routes {
        tracing::info!(
            route = route.name(),
            prefix = route.prefix(),
            upstream = %route.upstream(),
            requires_auth = route.requires_auth(),
            "route registered"
        );
    }

    Ok(AppState::new(authority, proxy, routes))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(&state).with_state(state);

    middleware::http::apply(router, config)
}
