use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Field names of the persisted settings record.
///
/// The spelling matches records written by earlier releases of the plugin,
/// so existing installations keep their overrides.
pub mod fields {
    pub const OPERATOR_NAME: &str = "operaterName";
    pub const OPERATOR_PASSWORD: &str = "operaterPassword";
    pub const ENDPOINT: &str = "endpoint";
    pub const BUCKET: &str = "bucket";
    pub const PATH: &str = "path";
    pub const HOST: &str = "host";

    pub const ALL: [&str; 6] = [OPERATOR_NAME, OPERATOR_PASSWORD, ENDPOINT, BUCKET, PATH, HOST];
}

/// Raw persisted overrides, as returned by the settings store.
///
/// Fields that were never saved are simply absent.
pub type SettingsRecord = HashMap<String, String>;

/// The merged, currently-active storage configuration.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSettings {
    pub operator_name: String,
    pub operator_password: String,
    pub endpoint: String,
    pub bucket: String,
    pub remote_path_prefix: String,
    pub public_host: String,
}

impl EffectiveSettings {
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            bucket: self.bucket.clone(),
            operator_name: self.operator_name.clone(),
            operator_password: self.operator_password.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

impl fmt::Debug for EffectiveSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveSettings")
            .field("operator_name", &self.operator_name)
            .field("operator_password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("remote_path_prefix", &self.remote_path_prefix)
            .field("public_host", &self.public_host)
            .finish()
    }
}

/// Everything needed to construct an authenticated remote-store client.
///
/// Two values comparing equal means an existing client can be reused.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub bucket: String,
    pub operator_name: String,
    pub operator_password: String,
    pub endpoint: String,
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("bucket", &self.bucket)
            .field("operator_name", &self.operator_name)
            .field("operator_password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// What the caller wants uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadDescriptor {
    /// A file already written to local disk by the host.
    File {
        path: PathBuf,
        name: String,
        size: u64,
    },
    /// A remote image that must be fetched and resized first. `size` is
    /// whatever the host declared, if anything.
    Url { url: String, size: Option<u64> },
}

/// Which host entry point an upload came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    File,
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadKind::Image => "image",
            UploadKind::File => "file",
        };
        write!(f, "{}", s)
    }
}

/// Remote path of an uploaded object: `{prefix}/{uuid}{ext}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteObjectKey(String);

impl RemoteObjectKey {
    pub(crate) fn new(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Original filename as supplied by the caller.
    pub name: String,
    /// Publicly resolvable address of the stored object.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings() -> EffectiveSettings {
        EffectiveSettings {
            operator_name: "op".to_string(),
            operator_password: "hunter2".to_string(),
            endpoint: "v0.api.upyun.com".to_string(),
            bucket: "mybucket".to_string(),
            remote_path_prefix: "assets".to_string(),
            public_host: String::new(),
        }
    }

    #[test]
    fn connection_params_are_taken_from_settings() {
        let params = sample_settings().connection_params();

        assert_eq!(params.bucket, "mybucket");
        assert_eq!(params.operator_name, "op");
        assert_eq!(params.operator_password, "hunter2");
        assert_eq!(params.endpoint, "v0.api.upyun.com");
    }

    #[test]
    fn debug_output_never_contains_password() {
        let settings = sample_settings();

        assert!(!format!("{:?}", settings).contains("hunter2"));
        assert!(!format!("{:?}", settings.connection_params()).contains("hunter2"));
    }

    #[test]
    fn upload_result_serializes_name_and_url() {
        let result = UploadResult {
            name: "cat.png".to_string(),
            url: "http://cdn.example.com/a.png".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "cat.png", "url": "http://cdn.example.com/a.png"})
        );
    }
}
