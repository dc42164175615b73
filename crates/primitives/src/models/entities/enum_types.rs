use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    DbEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::OrderStatus"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    PaymentFailed,
    Cancelled,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    DbEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::PaymentStatus"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Initiated,
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Failed)
    }
}

/// What the callback boundary did with a delivery. Stored as text on `callback_events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CallbackOutcome {
    Completed,
    Failed,
    NoMatchingPayment,
    AlreadySettled,
    Rejected,
    Error,
}
