pub mod config;
pub mod data;
pub mod device_id;
pub mod status;
