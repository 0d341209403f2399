use std::fmt;

use chrono::{DateTime, Utc};
use prost::Message;
use uuid::Uuid;

use crate::events::schema::PatientEvent;
use crate::repos::patient_repo::PatientRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    PatientCreated,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientCreated => "PATIENT_CREATED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one state change, built once per successful mutation.
///
/// Carries only the denormalized fields downstream consumers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEvent {
    event_type: EventType,
    subject_id: Uuid,
    name: String,
    email: String,
    emitted_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(event_type: EventType, patient: &PatientRow) -> Self {
        Self {
            event_type,
            subject_id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            emitted_at: Utc::now(),
        }
    }

    pub fn patient_created(patient: &PatientRow) -> Self {
        Self::new(EventType::PatientCreated, patient)
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    pub fn emitted_at(&self) -> DateTime<Utc> {
        self.emitted_at
    }

    pub fn to_message(&self) -> PatientEvent {
        PatientEvent {
            patient_id: self.subject_id.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            event_type: self.event_type.as_str().to_string(),
            emitted_at_ms: self.emitted_at.timestamp_millis(),
        }
    }

    /// Serialize to the protobuf payload.
    pub fn encode(&self) -> Result<Vec<u8>, prost::EncodeError> {
        let message = self.to_message();
        let mut buf = Vec::with_capacity(message.encoded_len());
        message.encode(&mut buf)?;
        Ok(buf)
    }
}
