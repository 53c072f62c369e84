use async_trait::async_trait;

use crate::uploads::application::domain::{
    entities::{UploadDescriptor, UploadResult},
    errors::UploadError,
    policies::upload_policy::UploadPolicy,
};

/// Upload an attachment of any type from local disk.
#[async_trait]
pub trait UploadFileUseCase: Send + Sync {
    async fn execute(
        &self,
        descriptor: UploadDescriptor,
        policy: &UploadPolicy,
    ) -> Result<UploadResult, UploadError>;
}
