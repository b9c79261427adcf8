use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Delivery failure from a management client. `gone` flags connections that
/// no longer exist and should be evicted rather than retried.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PostError {
    pub gone: bool,
    pub message: String,
}

impl PostError {
    #[must_use]
    pub fn gone(connection_id: &str) -> Self {
        Self { gone: true, message: format!("connection gone: {connection_id}") }
    }
}

impl From<PostError> for crate::errors::GatherlyError {
    fn from(e: PostError) -> Self {
        Self::Realtime(e.to_string())
    }
}

/// Outbound transport for one management endpoint.
pub trait ManagementClient: Send + Sync {
    /// Delivers `payload` to a single connection.
    ///
    /// # Errors
    /// Returns an error if the connection rejects the payload or no longer
    /// exists.
    fn post_to_connection(&self, connection_id: &str, payload: &[u8]) -> Result<(), PostError>;
}

pub type ClientFactory = dyn Fn(&str) -> Arc<dyn ManagementClient> + Send + Sync;

/// Endpoint-keyed cache of outbound clients. Owned by the publisher and
/// injected at construction; the factory runs once per endpoint.
pub struct ClientPool {
    factory: Box<ClientFactory>,
    clients: RwLock<HashMap<String, Arc<dyn ManagementClient>>>,
}

impl ClientPool {
    #[must_use]
    pub fn new(factory: Box<ClientFactory>) -> Self {
        Self { factory, clients: RwLock::new(HashMap::new()) }
    }

    pub fn client_for(&self, endpoint: &str) -> Arc<dyn ManagementClient> {
        if let Some(client) = self.clients.read().get(endpoint) {
            return client.clone();
        }
        let mut clients = self.clients.write();
        clients
            .entry(endpoint.to_string())
            .or_insert_with(|| (self.factory)(endpoint))
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }
}
