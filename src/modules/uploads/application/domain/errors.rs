use std::fmt::Display;

/// Prefix stamped on every upstream and settings error so the host can tell
/// where a failure came from.
pub const PLUGIN_NAMESPACE: &str = env!("CARGO_PKG_NAME");

/// Every way an upload can fail. An upload reports exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("invalid mime type")]
    InvalidMimeType(Option<String>),

    /// Rendered as the host's translation key so it can be shown to users.
    #[error("[[error:file-too-big, {limit_kb}]]")]
    FileTooBig { limit_kb: u64 },

    #[error("{ns} :: {0}", ns = PLUGIN_NAMESPACE)]
    UpstreamFailure(String),
}

impl UploadError {
    /// Wraps a disk, fetch, resize or remote-store failure.
    pub fn upstream(cause: impl Display) -> Self {
        UploadError::UpstreamFailure(cause.to_string())
    }
}

/// Failures of settings resolution and persistence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{ns} :: {0}", ns = PLUGIN_NAMESPACE)]
    Store(String),
}
