use axum::body::Bytes;
use axum::extract::{Json, State};
use lipa_core::services::callback_service::CallbackService;
use lipa_core::AppState;
use lipa_primitives::models::dtos::callback_dto::CallbackAck;
use lipa_primitives::models::providers::mpesa::StkCallbackEnvelope;
use std::sync::Arc;

/// The body is taken raw so that payloads we cannot parse are still acknowledged.
#[utoipa::path(
    post,
    path = "/api/payments/callback",
    request_body = StkCallbackEnvelope,
    responses(
        (status = 200, description = "Always 200. `ResultCode` 0 when processed, 1 when processing failed", body = CallbackAck)
    ),
    tag = "Webhook"
)]
pub async fn mpesa_callback(State(state): State<Arc<AppState>>, body: Bytes) -> Json<CallbackAck> {
    Json(CallbackService::acknowledge(&state, &body).await)
}
