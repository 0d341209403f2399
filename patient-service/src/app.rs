/*
 * Responsibility
 * - load Config -> connect Postgres + broker -> build services
 * - assemble Router and HTTP layers
 * - start with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use axum::http::header::HeaderName;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::events::{EventPublisher, ValkeyStreamBroker};
use crate::repos::patient_repo::PgPatientRepo;
use crate::services::patient_service::PatientService;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,patient_service=debug,tower_http=debug cargo run -p patient-service
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
        tracing::error!(?info, "panic");

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
        "starting patient service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to postgres")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("failed to run migrations")?;

    // Broker connection is process-wide; publish tasks share it via the manager
    let broker = ValkeyStreamBroker::new(&config.broker_url, config.event_stream_maxlen)
        .await
        .context("failed to connect to event broker")?;

    tracing::info!(
        topic = %config.event_topic,
        maxlen = config.event_stream_maxlen,
        "event broker ready"
    );

    let events = EventPublisher::new(
        Arc::new(broker),
        config.event_topic.as_str(),
        config.publish_timeout,
    );
    let repo = Arc::new(PgPatientRepo::new(db));

    Ok(AppState::new(Arc::new(PatientService::new(repo, events))))
}

fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    api::v1::routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                request_id_header.clone(),
                MakeRequestUuid,
            ))
            .layer(PropagateRequestIdLayer::new(request_id_header))
            .layer(TraceLayer::new_for_http()),
    )
}
