use crate::models::entities::enum_types::OrderStatus;
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub customer_name: String,
    pub product: String,
    #[schema(value_type = String, example = "500.00")]
    pub amount: Decimal,
    pub status: OrderStatus,
    pub transaction_id: Option<String>,
    pub mpesa_receipt_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub customer_name: String,
    pub product: String,
    pub amount: Decimal,
}
