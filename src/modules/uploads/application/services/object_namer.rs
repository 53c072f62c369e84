use std::path::Path;
use uuid::Uuid;

use crate::uploads::application::domain::entities::{EffectiveSettings, RemoteObjectKey};

/// Normalize the configured prefix to `/segment[/segment...]` with no
/// trailing slash. An empty (or all-slash) prefix maps to `""`.
pub fn remote_dir(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Extension of `file_name` including the dot, or `""` if it has none.
///
/// Dotfiles such as `.env` have no extension.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Fresh, collision-free key for an upload: `{prefix}/{uuid}{ext}`.
pub fn name_for(prefix: &str, original_filename: &str) -> RemoteObjectKey {
    RemoteObjectKey::new(format!(
        "{}/{}{}",
        remote_dir(prefix),
        Uuid::new_v4(),
        extension_of(original_filename)
    ))
}

/// Last path segment of a URL, used as the original filename of
/// URL-sourced images. Query and fragment are ignored.
pub fn source_file_name(source_url: &str) -> String {
    let path = url::Url::parse(source_url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| source_url.to_string());

    path.rsplit('/').next().unwrap_or_default().to_string()
}

/// Scheme + host that public URLs are composed from.
///
/// Without a configured host the provider's default per-bucket domain is
/// used; a bare host gets `http://` prepended.
pub fn public_host(settings: &EffectiveSettings) -> String {
    let host = settings.public_host.trim().trim_end_matches('/');

    if host.is_empty() {
        format!("http://{}.b0.upaiyun.com", settings.bucket)
    } else if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

pub fn public_url(settings: &EffectiveSettings, key: &RemoteObjectKey) -> String {
    format!("{}{}", public_host(settings), key)
}
