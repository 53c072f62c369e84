use std::env;

pub const DEFAULT_ENDPOINT: &str = "v0.api.upyun.com";

/// Environment-sourced defaults for every storage setting.
///
/// Read once at startup; persisted overrides are layered on top by the
/// settings resolver.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StorageEnvDefaults {
    pub operator_name: Option<String>,
    pub operator_password: Option<String>,
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub path: Option<String>,
    pub host: Option<String>,
}

impl StorageEnvDefaults {
    /// Load defaults from the `UPYUN_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load defaults through an arbitrary lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            operator_name: read("UPYUN_OPERATER_NAME"),
            operator_password: read("UPYUN_OPERATER_PASSWORD"),
            endpoint: read("UPYUN_ENDPOINT"),
            bucket: read("UPYUN_UPLOADS_BUCKET"),
            path: read("UPYUN_UPLOADS_PATH"),
            host: read("UPYUN_HOST"),
        }
    }

    pub fn endpoint_or_default(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }
}

impl std::fmt::Debug for StorageEnvDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEnvDefaults")
            .field("operator_name", &self.operator_name)
            .field(
                "operator_password",
                &self.operator_password.as_ref().map(|_| "<redacted>"),
            )
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("path", &self.path)
            .field("host", &self.host)
            .finish()
    }
}
