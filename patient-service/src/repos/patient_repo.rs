/*
 * Responsibility
 * - persistence seam for patients (PatientRepo)
 * - SQLx operations against the `patient` table (PgPatientRepo)
 * - a unique-email violation surfaces as RepoError::Conflict
 */
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PatientRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

#[async_trait]
pub trait PatientRepo: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;

    /// Insert and return the stored form (with its generated id).
    async fn insert(&self, patient: &NewPatient) -> Result<PatientRow, RepoError>;

    async fn list(&self) -> Result<Vec<PatientRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgPatientRepo {
    db: PgPool,
}

impl PgPatientRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatientRepo for PgPatientRepo {
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM patient WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, patient: &NewPatient) -> Result<PatientRow, RepoError> {
        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            INSERT INTO patient (id, name, email, address, date_of_birth, registered_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, address, date_of_birth, registered_date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&patient.name)
        .bind(&patient.email)
        .bind(&patient.address)
        .bind(patient.date_of_birth)
        .bind(patient.registered_date)
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn list(&self) -> Result<Vec<PatientRow>, RepoError> {
        let rows = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, name, email, address, date_of_birth, registered_date
            FROM patient
            ORDER BY registered_date DESC, name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
