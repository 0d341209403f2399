//! Fire-and-forget domain event publisher.
//!
//! `publish` schedules exactly one delivery attempt on its own task and
//! returns immediately. The request path never awaits the handle. Any failure
//! is logged with enough context (event type, subject id, base64 payload) to
//! replay the event by hand, and then dropped.
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::events::broker::{BrokerError, EventBroker, EventRecord};
use crate::events::domain_event::DomainEvent;
use crate::events::schema::PATIENT_EVENT_SCHEMA;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize event: {0}")]
    Encode(#[from] prost::EncodeError),
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error("broker did not acknowledge within {0:?}")]
    TimedOut(Duration),
}

/// How a single publish attempt ended. Only observable by whoever holds the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAttempt {
    Delivered { entry_id: String },
    Failed { error: String },
}

#[derive(Clone)]
pub struct EventPublisher {
    broker: Arc<dyn EventBroker>,
    topic: Arc<str>,
    timeout: Duration,
}

impl EventPublisher {
    pub fn new(broker: Arc<dyn EventBroker>, topic: impl Into<Arc<str>>, timeout: Duration) -> Self {
        Self {
            broker,
            topic: topic.into(),
            timeout,
        }
    }

    /// Schedule one delivery attempt of `event` and return without waiting for it.
    pub fn publish(&self, event: DomainEvent) -> JoinHandle<PublishAttempt> {
        let publisher = self.clone();
        tokio::spawn(async move { publisher.attempt(event).await })
    }

    async fn attempt(&self, event: DomainEvent) -> PublishAttempt {
        let payload = match event.encode() {
            Ok(payload) => payload,
            Err(err) => {
                let err = PublishError::from(err);
                tracing::error!(
                    event_type = %event.event_type(),
                    subject_id = %event.subject_id(),
                    error = %err,
                    "failed to serialize domain event"
                );
                return PublishAttempt::Failed {
                    error: err.to_string(),
                };
            }
        };

        let record = EventRecord {
            event_type: event.event_type().as_str(),
            schema: PATIENT_EVENT_SCHEMA,
            subject_id: event.subject_id().to_string(),
            payload,
        };

        match self.deliver(&record).await {
            Ok(entry_id) => {
                tracing::info!(
                    event_type = record.event_type,
                    subject_id = %record.subject_id,
                    topic = %self.topic,
                    entry_id = %entry_id,
                    emitted_at = %event.emitted_at(),
                    "domain event published"
                );
                PublishAttempt::Delivered { entry_id }
            }
            Err(err) => {
                tracing::error!(
                    event_type = record.event_type,
                    subject_id = %record.subject_id,
                    topic = %self.topic,
                    broker = self.broker.backend_name(),
                    schema = record.schema,
                    payload = %BASE64.encode(&record.payload),
                    error = %err,
                    "failed to publish domain event"
                );
                PublishAttempt::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    async fn deliver(&self, record: &EventRecord) -> Result<String, PublishError> {
        let entry_id = tokio::time::timeout(self.timeout, self.broker.send(&self.topic, record))
            .await
            .map_err(|_| PublishError::TimedOut(self.timeout))??;

        Ok(entry_id)
    }
}
