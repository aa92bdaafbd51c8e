mod connection;
mod utils;
mod workers;

pub mod error;
pub mod file_store;
pub mod header;
pub mod request;
pub mod request_method;
pub mod response;
pub mod response_status_code;
pub mod router;
pub mod server;
pub mod server_config;
