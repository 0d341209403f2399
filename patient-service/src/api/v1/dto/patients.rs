/*
 * Responsibility
 * - Patients request/response DTO (camelCase on the wire)
 * - validate() turns a raw request into a NewPatient
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::patient_repo::{NewPatient, PatientRow};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub registered_date: Option<String>,
}

impl CreatePatientRequest {
    pub fn validate(self) -> Result<NewPatient, &'static str> {
        let name = self.name.unwrap_or_default().trim().to_string();
        if name.is_empty() {
            return Err("Name is required");
        }
        if name.chars().count() > 100 {
            return Err("Name cannot exceed 100 characters");
        }

        let email = self.email.unwrap_or_default().trim().to_string();
        if email.is_empty() {
            return Err("Email is required");
        }
        if !looks_like_email(&email) {
            return Err("Email should be valid");
        }
        if email.chars().count() > 255 {
            return Err("Email cannot exceed 255 characters");
        }

        let address = self.address.unwrap_or_default().trim().to_string();
        if address.is_empty() {
            return Err("Address is required");
        }
        if address.chars().count() > 255 {
            return Err("Address cannot exceed 255 characters");
        }

        let date_of_birth = parse_date(self.date_of_birth, "Date of birth is required")?;
        let registered_date = parse_date(self.registered_date, "Registered date is required")?;

        Ok(NewPatient {
            name,
            email,
            address,
            date_of_birth,
            registered_date,
        })
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

// YYYY-MM-DD
fn parse_date(raw: Option<String>, missing: &'static str) -> Result<NaiveDate, &'static str> {
    let raw = raw.ok_or(missing)?;
    if raw.trim().is_empty() {
        return Err(missing);
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| "Dates must be YYYY-MM-DD")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
}

impl From<PatientRow> for PatientResponse {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            address: row.address,
            date_of_birth: row.date_of_birth,
        }
    }
}
