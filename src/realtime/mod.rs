// Submodules for separation of concerns
mod pool;
mod publisher;

// Public API re-exports
pub use pool::{ClientFactory, ClientPool, ManagementClient, PostError};
pub use publisher::{Channel, Connection, Publisher, PublishReport};
