use crate::uploads::application::domain::{
    entities::{UploadDescriptor, UploadKind},
    errors::UploadError,
    policies::upload_policy::UploadPolicy,
};

/// Mime type implied by the extension of `path_or_url`.
pub fn mime_type_of(path_or_url: &str) -> Option<String> {
    let path = url::Url::parse(path_or_url)
        .ok()
        .filter(|u| u.has_host())
        .map(|u| u.path().to_string())
        .unwrap_or_else(|| path_or_url.to_string());

    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
}

/// Reject `len` bytes if they exceed the policy limit.
pub fn ensure_within_limit(len: u64, policy: &UploadPolicy) -> Result<(), UploadError> {
    if len > policy.maximum_file_size_bytes() {
        return Err(UploadError::FileTooBig {
            limit_kb: policy.maximum_file_size_kb,
        });
    }
    Ok(())
}

fn ensure_allowed_mime(
    path_or_url: &str,
    kind: UploadKind,
    policy: &UploadPolicy,
) -> Result<(), UploadError> {
    let Some(allowed) = policy.allowed_mime_types(kind) else {
        return Ok(());
    };

    match mime_type_of(path_or_url) {
        Some(mime) if allowed.contains(&mime.as_str()) => Ok(()),
        other => Err(UploadError::InvalidMimeType(other)),
    }
}

/// Check an upload before any bytes are read or fetched.
///
/// Rules run in order: input shape, declared size, mime type. Generic file
/// uploads only accept local files and have no mime restriction.
pub fn validate(
    descriptor: &UploadDescriptor,
    kind: UploadKind,
    policy: &UploadPolicy,
) -> Result<(), UploadError> {
    match descriptor {
        UploadDescriptor::File { path, size, .. } => {
            let path = path.to_string_lossy();
            if path.trim().is_empty() {
                return Err(UploadError::InvalidInput(match kind {
                    UploadKind::Image => "invalid image path",
                    UploadKind::File => "invalid file path",
                }));
            }

            ensure_within_limit(*size, policy)?;
            ensure_allowed_mime(&path, kind, policy)
        }
        UploadDescriptor::Url { url, size } => {
            if kind == UploadKind::File {
                return Err(UploadError::InvalidInput("invalid file path"));
            }
            if url.trim().is_empty() {
                return Err(UploadError::InvalidInput("invalid image url"));
            }

            if let Some(size) = size {
                ensure_within_limit(*size, policy)?;
            }
            ensure_allowed_mime(url, kind, policy)
        }
    }
}
