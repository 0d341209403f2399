//! Message broker interface used by the event publisher.
use async_trait::async_trait;
use thiserror::Error;

/// Broker-layer errors (transport/command).
///
/// Kept apart from `AppError`: a broker failure is never visible to an HTTP caller.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker connection error: {0}")]
    Connection(String),
    #[error("broker command error: {0}")]
    Command(String),
}

/// One outbound message: serialized payload plus the metadata consumers route on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub event_type: &'static str,
    pub schema: &'static str,
    pub subject_id: String,
    pub payload: Vec<u8>,
}

/// A minimal broker interface: append one record to a topic.
///
/// The returned delivery id (acknowledgment) is for logging only.
/// Implementations hold a process-wide connection and must be shareable across tasks.
#[async_trait]
pub trait EventBroker: Send + Sync + 'static {
    // Broker backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn send(&self, topic: &str, record: &EventRecord) -> Result<String, BrokerError>;
}
