use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::uploads::application::ports::outgoing::{ImageSource, ImageSourceError};

/// Downloads remote images over HTTP(S).
#[derive(Clone, Default)]
pub struct HttpImageSource {
    http: Client,
}

impl HttpImageSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str, max_bytes: u64) -> Result<Vec<u8>, ImageSourceError> {
        let parsed = Url::parse(url).map_err(|e| ImageSourceError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ImageSourceError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let mut response = self
            .http
            .get(parsed)
            .send()
            .await
            .map_err(|e| ImageSourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageSourceError::Status(status.as_u16()));
        }

        let too_large = ImageSourceError::TooLarge { limit: max_bytes };
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(too_large);
        }

        // Content-Length can be absent or wrong; cap what is actually read.
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ImageSourceError::Network(e.to_string()))?
        {
            if (bytes.len() + chunk.len()) as u64 > max_bytes {
                return Err(too_large);
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}
