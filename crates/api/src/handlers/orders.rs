use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use lipa_core::services::order_service::OrderService;
use lipa_core::AppState;
use lipa_primitives::error::{ApiError, ApiErrorResponse};
use lipa_primitives::models::dtos::order_dto::CreateOrderRequest;
use lipa_primitives::models::entities::order::Order;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = OrderService::create(&state, req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "All orders, newest first", body = [Order]),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(OrderService::list(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found", body = ApiErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(OrderService::get(&state, id).await?))
}
