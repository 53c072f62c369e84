pub mod domain;
pub mod ports;
pub mod services;
pub mod storage_env;
