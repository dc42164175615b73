use diesel::prelude::*;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::callback_event::{CallbackEvent, NewCallbackEvent};
use lipa_primitives::schema::callback_events;

pub struct CallbackEventRepository;

impl CallbackEventRepository {
    pub fn create(
        conn: &mut PgConnection,
        new_event: NewCallbackEvent,
    ) -> Result<CallbackEvent, ApiError> {
        diesel::insert_into(callback_events::table)
            .values(&new_event)
            .get_result::<CallbackEvent>(conn)
            .map_err(ApiError::Database)
    }

    pub fn find_recent(conn: &mut PgConnection, limit: i64) -> Result<Vec<CallbackEvent>, ApiError> {
        callback_events::table
            .order((callback_events::received_at.desc(), callback_events::id.desc()))
            .limit(limit)
            .load::<CallbackEvent>(conn)
            .map_err(ApiError::Database)
    }
}
