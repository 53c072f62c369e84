use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::uploads::application::{
    domain::{
        entities::{EffectiveSettings, UploadDescriptor, UploadResult},
        errors::{SettingsError, UploadError},
        policies::upload_policy::UploadPolicy,
    },
    ports::{
        incoming::use_cases::{
            ResolveSettingsUseCase, SaveSettingsCommand, SaveSettingsUseCase, UploadFileUseCase,
            UploadImageUseCase,
        },
        outgoing::{ImageSource, ObjectStoreConnector, SettingsStore},
    },
    services::{
        ImageNormalizer, ObjectStoreProvider, ResolveSettingsService, SaveSettingsService,
        SharedSettings, UploadService,
    },
    storage_env::StorageEnvDefaults,
};

//
// ──────────────────────────────────────────────────────────
// Host payload DTOs
// ──────────────────────────────────────────────────────────
//

/// An upload as the host hands it over: a file it already wrote to disk,
/// or (images only) a remote URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostUpload {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageUploadRequest {
    #[serde(default)]
    pub image: Option<HostUpload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileUploadRequest {
    #[serde(default)]
    pub file: Option<HostUpload>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl HostUpload {
    /// A non-empty `url` wins; otherwise the upload is file-backed.
    pub fn into_image_descriptor(self) -> UploadDescriptor {
        match non_empty(self.url.clone()) {
            Some(url) => UploadDescriptor::Url {
                url,
                size: self.size,
            },
            None => self.into_file_descriptor(),
        }
    }

    /// Generic files are always file-backed. A missing name falls back to
    /// the file name of `path`.
    pub fn into_file_descriptor(self) -> UploadDescriptor {
        let path = self.path.unwrap_or_default();
        let name = non_empty(self.name).unwrap_or_else(|| {
            Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        UploadDescriptor::File {
            path: PathBuf::from(path),
            name,
            size: self.size.unwrap_or(0),
        }
    }
}

/// Storage-location form. Missing fields are saved as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettingsForm {
    pub bucket: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub endpoint: Option<String>,
}

impl From<StorageSettingsForm> for SaveSettingsCommand {
    fn from(form: StorageSettingsForm) -> Self {
        SaveSettingsCommand::StorageLocation {
            bucket: form.bucket.unwrap_or_default(),
            host: form.host.unwrap_or_default(),
            path: form.path.unwrap_or_default(),
            endpoint: form.endpoint.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    #[serde(rename = "operaterName")]
    pub operator_name: Option<String>,
    #[serde(rename = "operaterPassword")]
    pub operator_password: Option<String>,
}

impl From<CredentialsForm> for SaveSettingsCommand {
    fn from(form: CredentialsForm) -> Self {
        SaveSettingsCommand::Credentials {
            operator_name: form.operator_name.unwrap_or_default(),
            operator_password: form.operator_password.unwrap_or_default(),
        }
    }
}

//
// ──────────────────────────────────────────────────────────
// Plugin facade
// ──────────────────────────────────────────────────────────
//

/// Everything the host calls: lifecycle hooks, the two upload entry points
/// and the two settings updates.
pub struct UploadsPlugin {
    policy: UploadPolicy,
    settings: SharedSettings,
    object_stores: Arc<ObjectStoreProvider>,
    resolve_settings: Arc<dyn ResolveSettingsUseCase>,
    save_settings: Arc<dyn SaveSettingsUseCase>,
    upload_image: Arc<dyn UploadImageUseCase>,
    upload_file: Arc<dyn UploadFileUseCase>,
}

impl UploadsPlugin {
    /// Wire the services around the given adapters.
    pub fn wire<S, I>(
        settings_store: S,
        connector: Arc<dyn ObjectStoreConnector>,
        image_source: I,
        defaults: StorageEnvDefaults,
        policy: UploadPolicy,
    ) -> Self
    where
        S: SettingsStore + Clone + 'static,
        I: ImageSource + 'static,
    {
        let settings = SharedSettings::default();
        let object_stores = Arc::new(ObjectStoreProvider::new(connector));

        let resolve_settings: Arc<dyn ResolveSettingsUseCase> =
            Arc::new(ResolveSettingsService::new(
                settings_store.clone(),
                defaults,
                settings.clone(),
                Arc::clone(&object_stores),
            ));
        let save_settings = Arc::new(SaveSettingsService::new(
            settings_store,
            Arc::clone(&resolve_settings),
        ));
        let uploads = Arc::new(UploadService::new(
            settings.clone(),
            Arc::clone(&object_stores),
            ImageNormalizer::new(image_source),
        ));

        Self {
            policy,
            settings,
            object_stores,
            resolve_settings,
            save_settings,
            upload_image: uploads.clone(),
            upload_file: uploads,
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Resolve settings for the first time.
    pub async fn activate(&self) -> Result<EffectiveSettings, SettingsError> {
        self.resolve_settings.execute().await
    }

    /// Forget the remote-store client; the next upload reconnects.
    pub async fn deactivate(&self) {
        self.object_stores.invalidate().await;
        tracing::info!("Remote-store client released");
    }

    pub async fn current_settings(&self) -> EffectiveSettings {
        self.settings.snapshot().await
    }

    pub async fn upload_image(
        &self,
        request: ImageUploadRequest,
    ) -> Result<UploadResult, UploadError> {
        let Some(image) = request.image else {
            let err = UploadError::InvalidInput("invalid image");
            tracing::error!(error = %err, "Rejected image upload");
            return Err(err);
        };

        self.upload_image
            .execute(image.into_image_descriptor(), &self.policy)
            .await
    }

    pub async fn upload_file(&self, request: FileUploadRequest) -> Result<UploadResult, UploadError> {
        let Some(file) = request.file else {
            let err = UploadError::InvalidInput("invalid file");
            tracing::error!(error = %err, "Rejected file upload");
            return Err(err);
        };

        self.upload_file
            .execute(file.into_file_descriptor(), &self.policy)
            .await
    }

    pub async fn save_storage_settings(
        &self,
        form: StorageSettingsForm,
    ) -> Result<EffectiveSettings, SettingsError> {
        self.save_settings.execute(form.into()).await
    }

    pub async fn save_credentials(
        &self,
        form: CredentialsForm,
    ) -> Result<EffectiveSettings, SettingsError> {
        self.save_settings.execute(form.into()).await
    }
}
