use async_trait::async_trait;

use crate::events::broker::{BrokerError, EventBroker, EventRecord};

/// Valkey/Redis stream broker.
///
/// Each record is one stream entry (`XADD`), the stream capped at roughly
/// `maxlen` entries so a stalled consumer cannot grow it without bound.
#[derive(Clone)]
pub struct ValkeyStreamBroker {
    manager: redis::aio::ConnectionManager,
    maxlen: usize,
}

impl ValkeyStreamBroker {
    // Create a broker from a URL like `redis://localhost:6379`
    pub async fn new(url: &str, maxlen: usize) -> Result<Self, BrokerError> {
        let client =
            redis::Client::open(url).map_err(|e| BrokerError::Connection(e.to_string()))?;

        // The manager reconnects on its own after a broker outage
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { manager, maxlen })
    }
}

#[async_trait]
impl EventBroker for ValkeyStreamBroker {
    fn backend_name(&self) -> &'static str {
        "valkey-stream"
    }

    async fn send(&self, topic: &str, record: &EventRecord) -> Result<String, BrokerError> {
        let mut conn = self.manager.clone();

        // XADD returns the id of the new entry, e.g. `1718000000000-0`
        let entry_id: String = xadd(topic, self.maxlen, record)
            .query_async(&mut conn)
            .await
            .map_err(|e| BrokerError::Command(e.to_string()))?;

        Ok(entry_id)
    }
}

// XADD <topic> MAXLEN ~ <n> * event_type <t> schema <v> subject_id <id> payload <bytes>
fn xadd(topic: &str, maxlen: usize, record: &EventRecord) -> redis::Cmd {
    let mut cmd = redis::cmd("XADD");
    cmd.arg(topic)
        .arg("MAXLEN")
        .arg("~")
        .arg(maxlen)
        .arg("*")
        .arg("event_type")
        .arg(record.event_type)
        .arg("schema")
        .arg(record.schema)
        .arg("subject_id")
        .arg(&record.subject_id)
        .arg("payload")
        .arg(&record.payload);
    cmd
}
