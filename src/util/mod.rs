pub mod address;
pub mod api_request;
pub mod config;
pub mod sun;
pub mod timeday;
