use crate::models::app_state::mpesa_details::MpesaInfo;
use eyre::Report;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_url: String,

    pub app_env: String,

    pub mpesa_details: MpesaInfo,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        Ok(Self {
            app_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".into()),

            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),

            mpesa_details: MpesaInfo::new()?,
        })
    }
}
