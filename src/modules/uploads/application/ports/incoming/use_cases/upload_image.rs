use async_trait::async_trait;

use crate::uploads::application::domain::{
    entities::{UploadDescriptor, UploadResult},
    errors::UploadError,
    policies::upload_policy::UploadPolicy,
};

/// Upload an avatar-like image, either from local disk or from a URL.
#[async_trait]
pub trait UploadImageUseCase: Send + Sync {
    async fn execute(
        &self,
        descriptor: UploadDescriptor,
        policy: &UploadPolicy,
    ) -> Result<UploadResult, UploadError>;
}
