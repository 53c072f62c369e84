use async_trait::async_trait;
use std::sync::Arc;

use crate::uploads::application::{
    domain::{
        entities::{UploadDescriptor, UploadKind, UploadResult},
        errors::UploadError,
        policies::upload_policy::UploadPolicy,
    },
    ports::{
        incoming::use_cases::{UploadFileUseCase, UploadImageUseCase},
        outgoing::ImageSource,
    },
    services::{
        object_namer::{name_for, public_url, source_file_name},
        upload_validator::{ensure_within_limit, validate},
        ImageNormalizer, ObjectStoreProvider, SharedSettings,
    },
};

pub struct UploadService<S>
where
    S: ImageSource,
{
    settings: SharedSettings,
    object_stores: Arc<ObjectStoreProvider>,
    normalizer: ImageNormalizer<S>,
}

impl<S> UploadService<S>
where
    S: ImageSource,
{
    pub fn new(
        settings: SharedSettings,
        object_stores: Arc<ObjectStoreProvider>,
        normalizer: ImageNormalizer<S>,
    ) -> Self {
        Self {
            settings,
            object_stores,
            normalizer,
        }
    }

    async fn upload(
        &self,
        kind: UploadKind,
        descriptor: UploadDescriptor,
        policy: &UploadPolicy,
    ) -> Result<UploadResult, UploadError> {
        match self.run(kind, descriptor, policy).await {
            Ok(result) => {
                tracing::info!(kind = %kind, name = %result.name, url = %result.url, "Upload stored");
                Ok(result)
            }
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Upload failed");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        kind: UploadKind,
        descriptor: UploadDescriptor,
        policy: &UploadPolicy,
    ) -> Result<UploadResult, UploadError> {
        validate(&descriptor, kind, policy)?;

        let (original_name, bytes) = match descriptor {
            UploadDescriptor::File { path, name, .. } => {
                let bytes = tokio::fs::read(&path).await.map_err(|e| {
                    UploadError::upstream(format!("failed to read {}: {}", path.display(), e))
                })?;
                (name, bytes)
            }
            UploadDescriptor::Url { url, .. } => {
                let name = source_file_name(&url);
                let bytes = self.normalizer.normalize(&url, &name, policy).await?;
                (name, bytes)
            }
        };

        // The declared size can be stale or missing; check what was actually read.
        ensure_within_limit(bytes.len() as u64, policy)?;

        let settings = self.settings.snapshot().await;
        let key = name_for(&settings.remote_path_prefix, &original_name);

        let store = self
            .object_stores
            .store_for(&settings.connection_params())
            .await
            .map_err(UploadError::upstream)?;

        let stored = store
            .put_file(key.as_str(), bytes)
            .await
            .map_err(UploadError::upstream)?;
        tracing::debug!(bucket = %settings.bucket, location = %stored.location, "Object written");

        Ok(UploadResult {
            name: original_name,
            url: public_url(&settings, &key),
        })
    }
}

#[async_trait]
impl<S> UploadImageUseCase for UploadService<S>
where
    S: ImageSource,
{
    async fn execute(
        &self,
        descriptor: UploadDescriptor,
        policy: &UploadPolicy,
    ) -> Result<UploadResult, UploadError> {
        self.upload(UploadKind::Image, descriptor, policy).await
    }
}

#[async_trait]
impl<S> UploadFileUseCase for UploadService<S>
where
    S: ImageSource,
{
    async fn execute(
        &self,
        descriptor: UploadDescriptor,
        policy: &UploadPolicy,
    ) -> Result<UploadResult, UploadError> {
        self.upload(UploadKind::File, descriptor, policy).await
    }
}
