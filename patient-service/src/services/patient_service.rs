use std::sync::Arc;

use tracing::error;

use crate::error::AppError;
use crate::events::{DomainEvent, EventPublisher};
use crate::repos::patient_repo::{NewPatient, PatientRepo, PatientRow};

/// Patient use cases: persistence first, then the domain event.
///
/// The event is scheduled only after the insert returned the stored row, and
/// its outcome never feeds back into the caller's result.
#[derive(Clone)]
pub struct PatientService {
    repo: Arc<dyn PatientRepo>,
    events: EventPublisher,
}

impl PatientService {
    pub fn new(repo: Arc<dyn PatientRepo>, events: EventPublisher) -> Self {
        Self { repo, events }
    }

    pub async fn list(&self) -> Result<Vec<PatientRow>, AppError> {
        self.repo.list().await.map_err(|e| {
            error!(error = %e, "failed to list patients");
            AppError::from(e)
        })
    }

    pub async fn create(&self, patient: NewPatient) -> Result<PatientRow, AppError> {
        let exists = self.repo.exists_by_email(&patient.email).await.map_err(|e| {
            error!(error = %e, "failed to check patient email");
            AppError::from(e)
        })?;
        if exists {
            return Err(AppError::email_already_exists(&patient.email));
        }

        // A concurrent insert of the same email surfaces as RepoError::Conflict
        let stored = self.repo.insert(&patient).await.map_err(|e| {
            error!(error = %e, "failed to insert patient");
            AppError::from(e)
        })?;

        // Fire and forget: the handle is intentionally dropped
        drop(self.events.publish(DomainEvent::patient_created(&stored)));

        Ok(stored)
    }
}
