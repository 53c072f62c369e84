use async_trait::async_trait;
use std::sync::Arc;

use crate::uploads::application::{
    domain::{
        entities::EffectiveSettings,
        errors::{SettingsError, PLUGIN_NAMESPACE},
    },
    ports::{
        incoming::use_cases::{ResolveSettingsUseCase, SaveSettingsCommand, SaveSettingsUseCase},
        outgoing::SettingsStore,
    },
};

pub struct SaveSettingsService<S>
where
    S: SettingsStore,
{
    store: S,
    resolver: Arc<dyn ResolveSettingsUseCase>,
}

impl<S> SaveSettingsService<S>
where
    S: SettingsStore,
{
    pub fn new(store: S, resolver: Arc<dyn ResolveSettingsUseCase>) -> Self {
        Self { store, resolver }
    }
}

#[async_trait]
impl<S> SaveSettingsUseCase for SaveSettingsService<S>
where
    S: SettingsStore + Send + Sync,
{
    async fn execute(
        &self,
        command: SaveSettingsCommand,
    ) -> Result<EffectiveSettings, SettingsError> {
        tracing::info!(command = ?command, "Saving storage settings");

        self.store
            .set_object(PLUGIN_NAMESPACE, &command.to_record())
            .await
            .map_err(|e| {
                let err = SettingsError::Store(e.to_string());
                tracing::error!(error = %err, "Failed to persist settings");
                err
            })?;

        self.resolver.execute().await
    }
}
