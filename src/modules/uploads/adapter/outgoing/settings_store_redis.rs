use async_trait::async_trait;
use deadpool_redis::Pool;
use std::sync::Arc;

use crate::uploads::application::{
    domain::entities::SettingsRecord,
    ports::outgoing::{SettingsStore, SettingsStoreError},
};

/// Redis-backed settings persistence.
///
/// ## Redis data model
/// ```text
/// settings:{key} -> HASH { field -> value }
/// ```
/// Saving merges fields into the hash, so credentials and storage location
/// can be written independently.
#[derive(Clone)]
pub struct RedisSettingsStore {
    pool: Arc<Pool>,
}

impl RedisSettingsStore {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    fn settings_key(key: &str) -> String {
        format!("settings:{key}")
    }

    async fn get_conn(&self) -> Result<deadpool_redis::Connection, SettingsStoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| SettingsStoreError::DatabaseError(format!("Pool error: {}", e)))
    }
}

/// Pair up requested field names with the `HMGET` reply, dropping the
/// fields Redis had no value for.
fn record_from_reply(names: &[&str], values: Vec<Option<String>>) -> SettingsRecord {
    names
        .iter()
        .zip(values)
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect()
}

#[async_trait]
impl SettingsStore for RedisSettingsStore {
    /// ```text
    /// HMGET settings:{key} field [field ...]
    /// ```
    async fn get_fields(
        &self,
        key: &str,
        names: &[&str],
    ) -> Result<SettingsRecord, SettingsStoreError> {
        if names.is_empty() {
            return Ok(SettingsRecord::new());
        }

        let mut conn = self.get_conn().await?;

        let values: Vec<Option<String>> = deadpool_redis::redis::cmd("HMGET")
            .arg(Self::settings_key(key))
            .arg(names)
            .query_async(&mut *conn)
            .await
            .map_err(|e| SettingsStoreError::DatabaseError(e.to_string()))?;

        Ok(record_from_reply(names, values))
    }

    /// ```text
    /// HSET settings:{key} field value [field value ...]
    /// ```
    async fn set_object(
        &self,
        key: &str,
        record: &SettingsRecord,
    ) -> Result<(), SettingsStoreError> {
        if record.is_empty() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;

        let mut cmd = deadpool_redis::redis::cmd("HSET");
        cmd.arg(Self::settings_key(key));
        for (field, value) in record {
            cmd.arg(field).arg(value);
        }

        cmd.query_async::<()>(&mut *conn)
            .await
            .map_err(|e| SettingsStoreError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
