use eyre::{eyre, Report};
use secrecy::SecretString;
use std::env;

pub const SANDBOX_BASE_URL: &str = "https://sandbox.safaricom.co.ke";
pub const PRODUCTION_BASE_URL: &str = "https://api.safaricom.co.ke";

#[derive(Debug, Clone)]
pub struct MpesaInfo {
    pub mpesa_api_url: String,
    pub consumer_key: String,
    pub consumer_secret: SecretString,
    pub shortcode: String,
    pub passkey: SecretString,
    pub callback_url: String,
    pub transaction_desc: String,
    pub account_reference: String,
    pub timeout_secs: u64,
}

impl MpesaInfo {
    pub fn new() -> Result<Self, Report> {
        let mpesa_env = env::var("MPESA_ENV").unwrap_or_else(|_| "sandbox".into());

        Ok(Self {
            mpesa_api_url: env::var("MPESA_API_URL")
                .unwrap_or_else(|_| Self::base_url_for(&mpesa_env).into()),

            consumer_key: env::var("MPESA_CONSUMER_KEY")
                .map_err(|_| eyre!("MPESA_CONSUMER_KEY must be set"))?,

            consumer_secret: SecretString::new(
                env::var("MPESA_CONSUMER_SECRET")
                    .map_err(|_| eyre!("MPESA_CONSUMER_SECRET must be set"))?
                    .into(),
            ),

            shortcode: env::var("MPESA_SHORTCODE")
                .map_err(|_| eyre!("MPESA_SHORTCODE must be set"))?,

            passkey: SecretString::new(
                env::var("MPESA_PASSKEY")
                    .map_err(|_| eyre!("MPESA_PASSKEY must be set"))?
                    .into(),
            ),

            callback_url: env::var("MPESA_CALLBACK_URL")
                .map_err(|_| eyre!("MPESA_CALLBACK_URL must be set"))?,

            transaction_desc: env::var("MPESA_TRANSACTION_DESC")
                .unwrap_or_else(|_| "Order Payment".into()),

            account_reference: env::var("MPESA_ACCOUNT_REFERENCE")
                .unwrap_or_else(|_| "ORDER".into()),

            timeout_secs: env::var("MPESA_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .map_err(|e| eyre!("Invalid MPESA_TIMEOUT_SECS: {}", e))?,
        })
    }

    /// Anything other than `production` talks to the sandbox.
    pub fn base_url_for(mpesa_env: &str) -> &'static str {
        if mpesa_env.eq_ignore_ascii_case("production") {
            PRODUCTION_BASE_URL
        } else {
            SANDBOX_BASE_URL
        }
    }
}
