/*
 * Responsibility
 * - URL layout of the patient API
 * - the gateway strips its `/api` prefix, so these are the upstream paths
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    health::health,
    patients::{create_patient, list_patients},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(create_patient))
}
