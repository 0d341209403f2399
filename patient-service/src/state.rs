/*
 * Responsibility
 * - shared context handed to every handler
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::services::patient_service::PatientService;

#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<PatientService>,
}

impl AppState {
    pub fn new(patients: Arc<PatientService>) -> Self {
        Self { patients }
    }
}
