use axum::extract::{Json, Query, State};
use lipa_core::services::callback_service::CallbackService;
use lipa_core::AppState;
use lipa_primitives::error::{ApiError, ApiErrorResponse};
use lipa_primitives::models::dtos::callback_dto::CallbackEventsQuery;
use lipa_primitives::models::entities::callback_event::CallbackEvent;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/callbacks",
    params(CallbackEventsQuery),
    responses(
        (status = 200, description = "Recorded callback deliveries, newest first", body = [CallbackEvent]),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Webhook"
)]
pub async fn list_callback_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackEventsQuery>,
) -> Result<Json<Vec<CallbackEvent>>, ApiError> {
    Ok(Json(CallbackService::recent_events(&state, query.limit).await?))
}
