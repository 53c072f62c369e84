use async_trait::async_trait;

use crate::uploads::application::domain::entities::SettingsRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Port to the host's key-value store that persists operator overrides.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the named fields of the object stored at `key`.
    ///
    /// Fields that were never written are absent from the returned record.
    async fn get_fields(
        &self,
        key: &str,
        names: &[&str],
    ) -> Result<SettingsRecord, SettingsStoreError>;

    /// Merge `record` into the object stored at `key`.
    async fn set_object(&self, key: &str, record: &SettingsRecord)
        -> Result<(), SettingsStoreError>;
}
