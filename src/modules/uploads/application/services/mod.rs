pub mod image_normalizer;
pub mod object_namer;
pub mod object_store_provider;
pub mod resolve_settings_service;
pub mod save_settings_service;
pub mod settings_state;
pub mod upload_service;
pub mod upload_validator;

pub use image_normalizer::ImageNormalizer;
pub use object_store_provider::ObjectStoreProvider;
pub use resolve_settings_service::ResolveSettingsService;
pub use save_settings_service::SaveSettingsService;
pub use settings_state::SharedSettings;
pub use upload_service::UploadService;
