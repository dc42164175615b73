use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use lipa_core::services::payment_service::PaymentService;
use lipa_core::AppState;
use lipa_primitives::error::{ApiError, ApiErrorResponse};
use lipa_primitives::models::dtos::payment_dto::{CreatePaymentRequest, UpdatePaymentStatusRequest};
use lipa_primitives::models::entities::payment::Payment;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/payments",
    responses(
        (status = 200, description = "All payments, newest first", body = [Payment]),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(PaymentService::list(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(("id" = i32, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment found", body = Payment),
        (status = 404, description = "Payment not found", body = ApiErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(PaymentService::get(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded with status `initiated`", body = Payment),
        (status = 400, description = "Missing or invalid fields", body = ApiErrorResponse),
        (status = 404, description = "Order not found", body = ApiErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let payment = PaymentService::create(&state, req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    put,
    path = "/api/payments/{id}/status",
    params(("id" = i32, Path, description = "Payment id")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Payment),
        (status = 404, description = "Payment not found", body = ApiErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn update_payment_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(PaymentService::update_status(&state, id, req).await?))
}
