use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageSourceError {
    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Network problem occurred: {0}")]
    Network(String),

    #[error("Fetch failed with status {0}")]
    Status(u16),

    #[error("Body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Port for downloading a remote image.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch `url`, failing with `TooLarge` once the body passes `max_bytes`.
    async fn fetch(&self, url: &str, max_bytes: u64) -> Result<Vec<u8>, ImageSourceError>;
}
