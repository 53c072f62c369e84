mod resolve_settings;
mod save_settings;
mod upload_file;
mod upload_image;

pub use resolve_settings::ResolveSettingsUseCase;
pub use save_settings::{SaveSettingsCommand, SaveSettingsUseCase};
pub use upload_file::UploadFileUseCase;
pub use upload_image::UploadImageUseCase;
