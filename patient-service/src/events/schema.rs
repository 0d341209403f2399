//! Wire schema of the patient event stream.
//!
//! Field numbers 1..=4 are read by existing consumers and must never be
//! renumbered. New fields get new numbers.

/// Versioned schema tag sent alongside every payload.
pub const PATIENT_EVENT_SCHEMA: &str = "patient.events.PatientEvent/v1";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PatientEvent {
    #[prost(string, tag = "1")]
    pub patient_id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub email: String,
    #[prost(string, tag = "4")]
    pub event_type: String,
    /// Unix epoch millis.
    #[prost(int64, tag = "5")]
    pub emitted_at_ms: i64,
}
