//! Domain events emitted after successful writes.
//!
//! Flow: `DomainEvent` (built from the stored row) -> protobuf payload ->
//! `EventBroker::send` on a spawned task. Nothing here can fail a request.
pub mod broker;
pub mod domain_event;
pub mod publisher;
pub mod schema;
pub mod valkey;

pub use domain_event::DomainEvent;
pub use publisher::EventPublisher;
pub use valkey::ValkeyStreamBroker;
