use std::sync::Arc;
use tokio::sync::Mutex;

use crate::uploads::application::{
    domain::entities::ConnectionParams,
    ports::outgoing::{ObjectStoreConnector, ObjectStoreError, RemoteObjectStore},
};

struct CachedStore {
    params: ConnectionParams,
    store: Arc<dyn RemoteObjectStore>,
}

/// Hands out the remote-store client, constructing it lazily.
///
/// The lock is held across construction, so concurrent first callers wait
/// for one connect instead of each building their own client. A client is
/// reused for as long as the connection parameters stay the same.
pub struct ObjectStoreProvider {
    connector: Arc<dyn ObjectStoreConnector>,
    cached: Mutex<Option<CachedStore>>,
}

impl ObjectStoreProvider {
    pub fn new(connector: Arc<dyn ObjectStoreConnector>) -> Self {
        Self {
            connector,
            cached: Mutex::new(None),
        }
    }

    /// Get the client for `params`, connecting if none is cached or the
    /// cached one was built from different parameters.
    pub async fn store_for(
        &self,
        params: &ConnectionParams,
    ) -> Result<Arc<dyn RemoteObjectStore>, ObjectStoreError> {
        let mut cached = self.cached.lock().await;

        if let Some(existing) = cached.as_ref() {
            if &existing.params == params {
                return Ok(Arc::clone(&existing.store));
            }
        }

        tracing::info!(
            bucket = %params.bucket,
            endpoint = %params.endpoint,
            "Connecting to remote object store"
        );

        let store = self.connector.connect(params).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to construct remote object store client");
            e
        })?;

        *cached = Some(CachedStore {
            params: params.clone(),
            store: Arc::clone(&store),
        });

        Ok(store)
    }

    /// Drop the cached client if it was built from other parameters.
    pub async fn refresh(&self, params: &ConnectionParams) {
        let mut cached = self.cached.lock().await;
        if cached.as_ref().is_some_and(|c| &c.params != params) {
            tracing::info!("Connection parameters changed; dropping cached client");
            *cached = None;
        }
    }

    /// Drop the cached client unconditionally.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    #[cfg(test)]
    pub(crate) async fn is_connected(&self) -> bool {
        self.cached.lock().await.is_some()
    }
}
