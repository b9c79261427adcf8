use crate::errors::GatherlyError;
use bson::Document;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::pool::ClientPool;

/// A realtime delivery channel: an event's chat room or a user's
/// notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    EventChat(String),
    Notifications(String),
}

/// One registered websocket connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: String,
    pub endpoint: String,
    pub channel: Channel,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: u64,
    pub evicted: u64,
    pub failed: u64,
}

/// Fans payloads out to every connection subscribed to a channel. Owns the
/// client pool and the connection registry; safe to share behind an `Arc`.
pub struct Publisher {
    pool: ClientPool,
    connections: RwLock<HashMap<String, Connection>>,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: ClientPool) -> Self {
        Self { pool, connections: RwLock::new(HashMap::new()) }
    }

    pub fn register(&self, conn: Connection) {
        self.connections.write().insert(conn.id.clone(), conn);
    }

    pub fn deregister(&self, connection_id: &str) -> bool {
        self.connections.write().remove(connection_id).is_some()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    /// Serializes `payload` once and posts it to every connection on
    /// `channel`. Gone connections are evicted from the registry; other
    /// delivery failures are logged and counted but do not abort the
    /// fan-out.
    ///
    /// # Errors
    /// Returns an error only if the payload cannot be serialized.
    pub fn publish(
        &self,
        channel: &Channel,
        payload: &Document,
    ) -> Result<PublishReport, GatherlyError> {
        let bytes = serde_json::to_vec(payload)?;
        let targets: Vec<Connection> = self
            .connections
            .read()
            .values()
            .filter(|c| &c.channel == channel)
            .cloned()
            .collect();
        let mut report = PublishReport::default();
        let mut gone: Vec<String> = Vec::new();
        for conn in targets {
            let client = self.pool.client_for(&conn.endpoint);
            match client.post_to_connection(&conn.id, &bytes) {
                Ok(()) => report.delivered += 1,
                Err(e) if e.gone => {
                    log::info!("evicting stale connection {}", conn.id);
                    gone.push(conn.id);
                }
                Err(e) => {
                    log::error!("post to connection {} failed: {e}", conn.id);
                    report.failed += 1;
                }
            }
        }
        if !gone.is_empty() {
            let mut connections = self.connections.write();
            for id in gone {
                if connections.remove(&id).is_some() {
                    report.evicted += 1;
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::pool::{ManagementClient, PostError};
    use bson::doc;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingClient {
        posts: Mutex<Vec<String>>,
        gone_ids: Vec<String>,
    }

    impl ManagementClient for RecordingClient {
        fn post_to_connection(&self, connection_id: &str, _payload: &[u8]) -> Result<(), PostError> {
            if self.gone_ids.iter().any(|id| id == connection_id) {
                return Err(PostError::gone(connection_id));
            }
            self.posts.lock().push(connection_id.to_string());
            Ok(())
        }
    }

    fn publisher_with(client: Arc<RecordingClient>) -> Publisher {
        let pool = ClientPool::new(Box::new(move |_endpoint| client.clone()));
        Publisher::new(pool)
    }

    #[test]
    fn publish_targets_only_the_channel() {
        let client = Arc::new(RecordingClient::default());
        let publisher = publisher_with(client.clone());
        let chat = Channel::EventChat("ev1".into());
        publisher.register(Connection { id: "c1".into(), endpoint: "e".into(), channel: chat.clone() });
        publisher.register(Connection {
            id: "c2".into(),
            endpoint: "e".into(),
            channel: Channel::Notifications("u1".into()),
        });
        let report = publisher.publish(&chat, &doc! {"text": "hi"}).unwrap();
        assert_eq!(report, PublishReport { delivered: 1, evicted: 0, failed: 0 });
        assert_eq!(*client.posts.lock(), vec!["c1".to_string()]);
    }

    #[test]
    fn gone_connections_are_evicted() {
        let client =
            Arc::new(RecordingClient { gone_ids: vec!["c1".into()], ..RecordingClient::default() });
        let publisher = publisher_with(client);
        let chat = Channel::EventChat("ev1".into());
        publisher.register(Connection { id: "c1".into(), endpoint: "e".into(), channel: chat.clone() });
        publisher.register(Connection { id: "c2".into(), endpoint: "e".into(), channel: chat.clone() });
        let report = publisher.publish(&chat, &doc! {"text": "hi"}).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.evicted, 1);
        assert_eq!(publisher.connection_count(), 1);
    }
}
