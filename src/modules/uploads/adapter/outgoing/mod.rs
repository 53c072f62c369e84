pub mod image_source_http;
pub mod object_store_upyun;
pub mod settings_store_redis;
