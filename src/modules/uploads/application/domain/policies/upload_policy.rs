use crate::uploads::application::domain::entities::UploadKind;

/// Host-side upload limits applied to every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub maximum_file_size_kb: u64,
    /// Edge length, in pixels, of the square that URL-sourced images are
    /// resized to.
    pub profile_image_dimension: u32,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            maximum_file_size_kb: Self::DEFAULT_MAXIMUM_FILE_SIZE_KB,
            profile_image_dimension: Self::DEFAULT_PROFILE_IMAGE_DIMENSION,
        }
    }
}

impl UploadPolicy {
    pub const DEFAULT_MAXIMUM_FILE_SIZE_KB: u64 = 2048;
    pub const DEFAULT_PROFILE_IMAGE_DIMENSION: u32 = 128;
    pub const IMAGE_MIME_TYPES: &'static [&'static str] =
        &["image/png", "image/jpeg", "image/gif"];

    /// Load policy from `MAXIMUM_FILE_SIZE_KB` and `PROFILE_IMAGE_DIMENSION`.
    ///
    /// Missing or unparsable values fall back to the defaults; a zero
    /// dimension counts as unset.
    pub fn from_env() -> Self {
        let maximum_file_size_kb = std::env::var("MAXIMUM_FILE_SIZE_KB")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_MAXIMUM_FILE_SIZE_KB);

        let profile_image_dimension = std::env::var("PROFILE_IMAGE_DIMENSION")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok());

        Self::new(maximum_file_size_kb, profile_image_dimension)
    }

    pub fn new(maximum_file_size_kb: u64, profile_image_dimension: Option<u32>) -> Self {
        Self {
            maximum_file_size_kb,
            profile_image_dimension: profile_image_dimension
                .filter(|d| *d > 0)
                .unwrap_or(Self::DEFAULT_PROFILE_IMAGE_DIMENSION),
        }
    }

    pub fn maximum_file_size_bytes(&self) -> u64 {
        self.maximum_file_size_kb.saturating_mul(1024)
    }

    /// Images are for avatar-like use and restricted; generic files are
    /// attachments of any type.
    pub fn allowed_mime_types(&self, kind: UploadKind) -> Option<&'static [&'static str]> {
        match kind {
            UploadKind::Image => Some(Self::IMAGE_MIME_TYPES),
            UploadKind::File => None,
        }
    }
}
