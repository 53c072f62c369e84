use async_trait::async_trait;
use std::sync::Arc;

use crate::uploads::application::{
    domain::{
        entities::{fields, EffectiveSettings, SettingsRecord},
        errors::{SettingsError, PLUGIN_NAMESPACE},
    },
    ports::{incoming::use_cases::ResolveSettingsUseCase, outgoing::SettingsStore},
    services::{object_namer::remote_dir, ObjectStoreProvider, SharedSettings},
    storage_env::StorageEnvDefaults,
};

/// Persisted value if present and non-blank, else the environment default,
/// else `""`. The endpoint falls back further to the provider's API host.
pub fn merge(record: &SettingsRecord, defaults: &StorageEnvDefaults) -> EffectiveSettings {
    let pick = |field: &str, default: &Option<String>| {
        record
            .get(field)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .or_else(|| default.clone())
            .unwrap_or_default()
    };

    let endpoint = record
        .get(fields::ENDPOINT)
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| defaults.endpoint_or_default());

    EffectiveSettings {
        operator_name: pick(fields::OPERATOR_NAME, &defaults.operator_name),
        operator_password: pick(fields::OPERATOR_PASSWORD, &defaults.operator_password),
        endpoint,
        bucket: pick(fields::BUCKET, &defaults.bucket),
        remote_path_prefix: pick(fields::PATH, &defaults.path),
        public_host: pick(fields::HOST, &defaults.host),
    }
}

pub struct ResolveSettingsService<S>
where
    S: SettingsStore,
{
    store: S,
    defaults: StorageEnvDefaults,
    settings: SharedSettings,
    object_stores: Arc<ObjectStoreProvider>,
}

impl<S> ResolveSettingsService<S>
where
    S: SettingsStore,
{
    pub fn new(
        store: S,
        defaults: StorageEnvDefaults,
        settings: SharedSettings,
        object_stores: Arc<ObjectStoreProvider>,
    ) -> Self {
        Self {
            store,
            defaults,
            settings,
            object_stores,
        }
    }

    /// Ask the remote store to create the upload directory. The directory
    /// may already exist, so failures are only logged.
    async fn provision_remote_dir(&self, settings: &EffectiveSettings) {
        let dir = remote_dir(&settings.remote_path_prefix);
        if dir.is_empty() {
            return;
        }

        let result = match self
            .object_stores
            .store_for(&settings.connection_params())
            .await
        {
            Ok(store) => store.make_dir(&dir).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::error!(
                remote_dir = %dir,
                error = %e,
                "{} :: failed to create remote directory",
                PLUGIN_NAMESPACE
            );
        }
    }
}

#[async_trait]
impl<S> ResolveSettingsUseCase for ResolveSettingsService<S>
where
    S: SettingsStore + Send + Sync,
{
    async fn execute(&self) -> Result<EffectiveSettings, SettingsError> {
        let record = self
            .store
            .get_fields(PLUGIN_NAMESPACE, &fields::ALL)
            .await
            .map_err(|e| {
                let err = SettingsError::Store(e.to_string());
                tracing::error!(error = %err, "Failed to read persisted settings");
                err
            })?;

        let resolved = merge(&record, &self.defaults);

        self.settings.replace(resolved.clone()).await;
        self.object_stores
            .refresh(&resolved.connection_params())
            .await;

        self.provision_remote_dir(&resolved).await;

        tracing::info!(
            bucket = %resolved.bucket,
            endpoint = %resolved.endpoint,
            remote_path_prefix = %resolved.remote_path_prefix,
            "Storage settings resolved"
        );

        Ok(resolved)
    }
}
