use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::Arc;
use url::Url;

use crate::uploads::application::{
    domain::entities::ConnectionParams,
    ports::outgoing::{ObjectStoreConnector, ObjectStoreError, RemoteObjectStore, StoredObject},
};

/// Base URL of the REST API. A bare host is reached over https.
fn endpoint_base(endpoint: &str) -> Result<String, ObjectStoreError> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        return Err(ObjectStoreError::Configuration("endpoint is empty".to_string()));
    }

    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ObjectStoreError::Configuration(format!("invalid endpoint {}: {}", endpoint, e)))?;
    if !url.has_host() {
        return Err(ObjectStoreError::Configuration(format!(
            "invalid endpoint {}: missing host",
            endpoint
        )));
    }

    Ok(candidate)
}

async fn ensure_success(response: Response) -> Result<Response, ObjectStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {}>", e));

    Err(ObjectStoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Builds Upyun REST clients that share one HTTP connection pool.
#[derive(Clone, Default)]
pub struct UpyunConnector {
    http: Client,
}

impl UpyunConnector {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStoreConnector for UpyunConnector {
    async fn connect(
        &self,
        params: &ConnectionParams,
    ) -> Result<Arc<dyn RemoteObjectStore>, ObjectStoreError> {
        if params.bucket.trim().is_empty() {
            return Err(ObjectStoreError::Configuration("bucket is empty".to_string()));
        }

        Ok(Arc::new(UpyunClient {
            http: self.http.clone(),
            base: endpoint_base(&params.endpoint)?,
            bucket: params.bucket.clone(),
            operator_name: params.operator_name.clone(),
            operator_password: params.operator_password.clone(),
        }))
    }
}

/// One bucket on the Upyun REST API, authenticated as one operator.
pub struct UpyunClient {
    http: Client,
    base: String,
    bucket: String,
    operator_name: String,
    operator_password: String,
}

impl UpyunClient {
    /// `{base}/{bucket}/{remote_path}`
    fn object_url(&self, remote_path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base,
            self.bucket,
            remote_path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl RemoteObjectStore for UpyunClient {
    async fn put_file(
        &self,
        remote_path: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, ObjectStoreError> {
        let size = bytes.len();

        let response = self
            .http
            .put(self.object_url(remote_path))
            .basic_auth(&self.operator_name, Some(&self.operator_password))
            .body(bytes)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Network(e.to_string()))?;
        ensure_success(response).await?;

        tracing::debug!(bucket = %self.bucket, remote_path, size, "Object stored");

        Ok(StoredObject {
            location: remote_path.to_string(),
        })
    }

    async fn make_dir(&self, remote_path: &str) -> Result<(), ObjectStoreError> {
        let response = self
            .http
            .post(self.object_url(remote_path))
            .basic_auth(&self.operator_name, Some(&self.operator_password))
            .header("folder", "true")
            .send()
            .await
            .map_err(|e| ObjectStoreError::Network(e.to_string()))?;
        ensure_success(response).await?;

        Ok(())
    }
}
