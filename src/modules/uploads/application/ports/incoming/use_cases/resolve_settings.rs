use async_trait::async_trait;

use crate::uploads::application::domain::{entities::EffectiveSettings, errors::SettingsError};

/// Recompute the effective settings from persisted overrides and
/// environment defaults, then publish them.
#[async_trait]
pub trait ResolveSettingsUseCase: Send + Sync {
    async fn execute(&self) -> Result<EffectiveSettings, SettingsError>;
}
