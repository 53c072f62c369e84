pub mod image_source;
pub mod object_store;
pub mod settings_store;

pub use image_source::{ImageSource, ImageSourceError};
pub use object_store::{ObjectStoreConnector, ObjectStoreError, RemoteObjectStore, StoredObject};
pub use settings_store::{SettingsStore, SettingsStoreError};
