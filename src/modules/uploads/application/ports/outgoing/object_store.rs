use async_trait::async_trait;
use std::sync::Arc;

use crate::uploads::application::domain::entities::ConnectionParams;

/// Where the remote store says it put an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Network problem occurred: {0}")]
    Network(String),

    #[error("Remote store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Port for the authenticated remote object store.
#[async_trait]
pub trait RemoteObjectStore: Send + Sync {
    /// Write `bytes` at `remote_path`, replacing any existing object.
    async fn put_file(
        &self,
        remote_path: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, ObjectStoreError>;

    /// Create the directory at `remote_path`.
    async fn make_dir(&self, remote_path: &str) -> Result<(), ObjectStoreError>;
}

/// Builds remote-store clients from connection parameters.
#[async_trait]
pub trait ObjectStoreConnector: Send + Sync {
    async fn connect(
        &self,
        params: &ConnectionParams,
    ) -> Result<Arc<dyn RemoteObjectStore>, ObjectStoreError>;
}
