use crate::models::entities::enum_types::PaymentStatus;
use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Associations, Identifiable, Insertable, Queryable, Selectable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const METHOD_MPESA_STK: &str = "mpesa_stk";

#[derive(
    Debug,
    Clone,
    PartialEq,
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(belongs_to(crate::models::entities::order::Order))]
pub struct Payment {
    pub id: i32,
    pub order_id: i32,
    pub user_id: Option<i32>,
    #[schema(value_type = String, example = "500.00")]
    pub amount: Decimal,
    #[schema(value_type = Option<String>)]
    pub amount_paid: Option<Decimal>,
    pub method: String,
    pub status: PaymentStatus,
    pub checkout_request_id: Option<String>,
    pub merchant_request_id: Option<String>,
    pub mpesa_receipt_number: Option<String>,
    pub transaction_date: Option<String>,
    pub phone_number: Option<String>,
    pub error_description: Option<String>,
    pub result_code: Option<i32>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPayment {
    pub order_id: i32,
    pub user_id: Option<i32>,
    pub amount: Decimal,
    pub method: String,
    pub status: PaymentStatus,
    pub checkout_request_id: Option<String>,
    pub merchant_request_id: Option<String>,
}

/// Sparse update for a payment row: `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = crate::schema::payments)]
pub struct PaymentPatch {
    pub status: Option<PaymentStatus>,
    pub mpesa_receipt_number: Option<String>,
    pub amount_paid: Option<Decimal>,
    pub transaction_date: Option<String>,
    pub phone_number: Option<String>,
    pub error_description: Option<String>,
    pub result_code: Option<i32>,
    pub transaction_id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PaymentPatch {
    /// True when the caller supplied nothing to write. `updated_at` alone does not count.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.mpesa_receipt_number.is_none()
            && self.amount_paid.is_none()
            && self.transaction_date.is_none()
            && self.phone_number.is_none()
            && self.error_description.is_none()
            && self.result_code.is_none()
            && self.transaction_id.is_none()
    }

    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        self.updated_at = Some(now);
        self
    }

    /// Applies the present fields to an in-memory row.
    pub fn apply_to(&self, payment: &mut Payment) {
        if let Some(status) = self.status {
            payment.status = status;
        }
        if let Some(receipt) = &self.mpesa_receipt_number {
            payment.mpesa_receipt_number = Some(receipt.clone());
        }
        if let Some(amount_paid) = self.amount_paid {
            payment.amount_paid = Some(amount_paid);
        }
        if let Some(date) = &self.transaction_date {
            payment.transaction_date = Some(date.clone());
        }
        if let Some(phone) = &self.phone_number {
            payment.phone_number = Some(phone.clone());
        }
        if let Some(description) = &self.error_description {
            payment.error_description = Some(description.clone());
        }
        if let Some(code) = self.result_code {
            payment.result_code = Some(code);
        }
        if let Some(transaction_id) = &self.transaction_id {
            payment.transaction_id = Some(transaction_id.clone());
        }
        if let Some(updated_at) = self.updated_at {
            payment.updated_at = updated_at;
        }
    }
}
