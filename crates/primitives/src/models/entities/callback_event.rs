use crate::models::entities::enum_types::CallbackOutcome;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One delivery received on the callback endpoint and what was done with it.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::callback_events)]
pub struct CallbackEvent {
    pub id: i64,
    pub checkout_request_id: Option<String>,
    pub result_code: Option<i32>,
    pub outcome: String,
    pub detail: Option<String>,
    #[schema(value_type = Object)]
    pub payload: Value,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::callback_events)]
pub struct NewCallbackEvent {
    pub checkout_request_id: Option<String>,
    pub result_code: Option<i32>,
    pub outcome: String,
    pub detail: Option<String>,
    pub payload: Value,
}

impl NewCallbackEvent {
    pub fn new(outcome: CallbackOutcome, payload: Value) -> Self {
        Self {
            checkout_request_id: None,
            result_code: None,
            outcome: outcome.to_string(),
            detail: None,
            payload,
        }
    }
}
