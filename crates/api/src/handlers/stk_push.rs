use axum::extract::{Json, State};
use lipa_core::services::stk_push_service::StkPushService;
use lipa_core::AppState;
use lipa_primitives::error::{ApiError, ApiErrorResponse};
use lipa_primitives::models::dtos::stk_dto::{StkPushRequest, StkPushResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/payments/stk",
    request_body = StkPushRequest,
    responses(
        (status = 200, description = "Payer prompted; a pending payment was recorded", body = StkPushResponse),
        (status = 400, description = "Missing fields or request denied by M-Pesa", body = ApiErrorResponse),
        (status = 404, description = "Order not found", body = ApiErrorResponse),
        (status = 409, description = "Order already paid", body = ApiErrorResponse),
        (status = 500, description = "Payment initiation failed", body = ApiErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn stk_push(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StkPushRequest>,
) -> Result<Json<StkPushResponse>, ApiError> {
    Ok(Json(StkPushService::initiate(&state, req).await?))
}
