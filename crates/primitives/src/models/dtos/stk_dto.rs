use crate::utility::validate_phone_number;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StkPushRequest {
    #[validate(required, range(min = 1, max = 250000))]
    #[schema(example = 500)]
    pub amount: Option<i64>,

    #[validate(required, custom(function = "validate_phone_number"))]
    #[schema(example = "254708374149")]
    pub phone_number: Option<String>,

    #[validate(required)]
    pub order_id: Option<i32>,

    pub user_id: Option<i32>,

    #[validate(length(max = 12))]
    pub account_reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StkPushResponse {
    pub message: String,
    pub checkout_request_id: String,
    pub merchant_request_id: String,
    pub customer_message: String,
}
