use crate::models::entities::enum_types::PaymentStatus;
use crate::utility::{validate_not_blank, validate_positive_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Manual payment record. Every field is required; missing ones are reported as validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreatePaymentRequest {
    #[validate(required)]
    pub order_id: Option<i32>,

    #[validate(required, custom(function = "validate_positive_amount"))]
    #[schema(value_type = Option<String>, example = "500.00")]
    pub amount: Option<Decimal>,

    #[validate(required, length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    #[schema(example = "cash")]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}
