use std::sync::Arc;
use tokio::sync::RwLock;

use crate::uploads::application::domain::entities::EffectiveSettings;

/// The currently-active settings, shared between the resolver (the only
/// writer) and the uploader.
///
/// Readers take a snapshot so one upload sees one consistent configuration.
#[derive(Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<EffectiveSettings>>,
}

impl SharedSettings {
    pub fn new(initial: EffectiveSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn snapshot(&self) -> EffectiveSettings {
        self.inner.read().await.clone()
    }

    pub(crate) async fn replace(&self, settings: EffectiveSettings) {
        *self.inner.write().await = settings;
    }
}
