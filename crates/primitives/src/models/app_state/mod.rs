pub mod app_config;
pub mod mpesa_details;

pub use app_config::*;
pub use mpesa_details::*;
