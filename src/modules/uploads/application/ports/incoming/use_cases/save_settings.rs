use async_trait::async_trait;

use crate::uploads::application::domain::{
    entities::{fields, EffectiveSettings, SettingsRecord},
    errors::SettingsError,
};

/// One operator-initiated settings update.
#[derive(Clone, PartialEq, Eq)]
pub enum SaveSettingsCommand {
    StorageLocation {
        bucket: String,
        host: String,
        path: String,
        endpoint: String,
    },
    Credentials {
        operator_name: String,
        operator_password: String,
    },
}

impl SaveSettingsCommand {
    /// The record written to the settings store. Every field of the update
    /// kind is written, so clearing a form field clears the override.
    pub fn to_record(&self) -> SettingsRecord {
        let mut record = SettingsRecord::new();
        match self {
            SaveSettingsCommand::StorageLocation {
                bucket,
                host,
                path,
                endpoint,
            } => {
                record.insert(fields::BUCKET.to_string(), bucket.clone());
                record.insert(fields::HOST.to_string(), host.clone());
                record.insert(fields::PATH.to_string(), path.clone());
                record.insert(fields::ENDPOINT.to_string(), endpoint.clone());
            }
            SaveSettingsCommand::Credentials {
                operator_name,
                operator_password,
            } => {
                record.insert(fields::OPERATOR_NAME.to_string(), operator_name.clone());
                record.insert(
                    fields::OPERATOR_PASSWORD.to_string(),
                    operator_password.clone(),
                );
            }
        }
        record
    }
}

impl std::fmt::Debug for SaveSettingsCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveSettingsCommand::StorageLocation {
                bucket,
                host,
                path,
                endpoint,
            } => f
                .debug_struct("StorageLocation")
                .field("bucket", bucket)
                .field("host", host)
                .field("path", path)
                .field("endpoint", endpoint)
                .finish(),
            SaveSettingsCommand::Credentials { operator_name, .. } => f
                .debug_struct("Credentials")
                .field("operator_name", operator_name)
                .field("operator_password", &"<redacted>")
                .finish(),
        }
    }
}

/// Persist an update, then re-resolve the effective settings.
#[async_trait]
pub trait SaveSettingsUseCase: Send + Sync {
    async fn execute(&self, command: SaveSettingsCommand)
        -> Result<EffectiveSettings, SettingsError>;
}
