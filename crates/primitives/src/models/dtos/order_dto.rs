use crate::utility::{validate_not_blank, validate_positive_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    #[schema(example = "Jane Wanjiku")]
    pub customer_name: String,

    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    #[schema(example = "Term 1 school fees")]
    pub product: String,

    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(value_type = String, example = "500.00")]
    pub amount: Decimal,
}
