use crate::clients::{PaymentGateway, StkPushParams};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, FixedOffset, Utc};
use lipa_primitives::error::{ApiError, MpesaError};
use lipa_primitives::models::app_state::mpesa_details::MpesaInfo;
use lipa_primitives::models::providers::mpesa::{
    MpesaAccessToken, MpesaErrorBody, StkPushAck, StkPushPayload,
};
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info, warn};

const TRANSACTION_TYPE: &str = "CustomerPayBillOnline";
const EAT_OFFSET_SECS: i32 = 3 * 3600;

#[derive(Clone)]
pub struct MpesaClient {
    http: Client,
    base_url: Url,
    consumer_key: String,
    consumer_secret: SecretString,
    shortcode: String,
    passkey: SecretString,
    callback_url: String,
    transaction_desc: String,
}

impl MpesaClient {
    pub fn new(http: Client, config: &MpesaInfo) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.mpesa_api_url)
            .map_err(|_| ApiError::Internal("Invalid M-Pesa base URL".into()))?;

        Ok(Self {
            http,
            base_url,
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            shortcode: config.shortcode.clone(),
            passkey: config.passkey.clone(),
            callback_url: config.callback_url.clone(),
            transaction_desc: config.transaction_desc.clone(),
        })
    }

    pub async fn access_token(&self) -> Result<String, MpesaError> {
        let mut url = self.endpoint("oauth/v1/generate");
        url.query_pairs_mut()
            .append_pair("grant_type", "client_credentials");

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.consumer_key, Some(self.consumer_secret.expose_secret()))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to reach M-Pesa OAuth endpoint");
                MpesaError::RequestFailed(e.to_string())
            })?;

        let resp = Self::ensure_success(resp, "oauth").await?;

        let token: MpesaAccessToken = resp
            .json()
            .await
            .map_err(|e| MpesaError::InvalidResponse(e.to_string()))?;

        Ok(token.access_token)
    }

    pub async fn stk_push(&self, params: StkPushParams<'_>) -> Result<StkPushAck, MpesaError> {
        let token = self.access_token().await?;
        let timestamp = stk_timestamp(Utc::now());
        let password = stk_password(&self.shortcode, self.passkey.expose_secret(), &timestamp);

        let payload = StkPushPayload {
            business_short_code: &self.shortcode,
            password,
            timestamp,
            transaction_type: TRANSACTION_TYPE,
            amount: params.amount,
            party_a: params.phone_number,
            party_b: &self.shortcode,
            phone_number: params.phone_number,
            call_back_url: &self.callback_url,
            account_reference: params.account_reference,
            transaction_desc: &self.transaction_desc,
        };

        let resp = self
            .http
            .post(self.endpoint("mpesa/stkpush/v1/processrequest"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to reach M-Pesa STK endpoint");
                MpesaError::RequestFailed(e.to_string())
            })?;

        let resp = Self::ensure_success(resp, "stk_push").await?;

        let ack: StkPushAck = resp
            .json()
            .await
            .map_err(|e| MpesaError::InvalidResponse(e.to_string()))?;

        info!(
            checkout_request_id = %ack.checkout_request_id,
            response_code = %ack.response_code,
            "M-Pesa STK push answered"
        );

        Ok(ack)
    }

    async fn ensure_success(resp: Response, call: &str) -> Result<Response, MpesaError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body_text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MpesaErrorBody>(&body_text)
            .ok()
            .and_then(|body| body.error_message)
            .unwrap_or_else(|| body_text.chars().take(200).collect());

        warn!(
            http_status = status.as_u16(),
            call,
            response = %message,
            "M-Pesa request failed"
        );

        Err(MpesaError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }
}

#[async_trait]
impl PaymentGateway for MpesaClient {
    async fn initiate(&self, params: StkPushParams<'_>) -> Result<StkPushAck, MpesaError> {
        self.stk_push(params).await
    }
}

/// `YYYYMMDDhhmmss` in East Africa Time, the clock Daraja validates against.
pub fn stk_timestamp(now: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(EAT_OFFSET_SECS) {
        Some(eat) => now.with_timezone(&eat).format("%Y%m%d%H%M%S").to_string(),
        None => now.format("%Y%m%d%H%M%S").to_string(),
    }
}

pub fn stk_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    STANDARD.encode(format!("{}{}{}", shortcode, passkey, timestamp))
}
