/*
 * Responsibility
 * - /patients handlers
 * - Json extractor -> DTO validation -> PatientService
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::patients::{CreatePatientRequest, PatientResponse},
    error::AppError,
    state::AppState,
};

pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientResponse>>, AppError> {
    let rows = state.patients.list().await?;

    Ok(Json(rows.into_iter().map(PatientResponse::from).collect()))
}

pub async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientRequest>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = req
        .validate()
        .map_err(|message| AppError::bad_request("VALIDATION_FAILED", message))?;

    let stored = state.patients.create(patient).await?;

    Ok(Json(PatientResponse::from(stored)))
}
