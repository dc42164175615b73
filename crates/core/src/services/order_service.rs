use crate::app_state::AppState;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::dtos::order_dto::CreateOrderRequest;
use lipa_primitives::models::entities::order::{NewOrder, Order};
use tracing::info;
use validator::Validate;

pub struct OrderService;

impl OrderService {
    pub async fn create(state: &AppState, req: CreateOrderRequest) -> Result<Order, ApiError> {
        req.validate()?;

        let order = state
            .store
            .create_order(NewOrder {
                customer_name: req.customer_name.trim().to_string(),
                product: req.product.trim().to_string(),
                amount: req.amount,
            })
            .await?;

        info!(order_id = order.id, amount = %order.amount, "Order created");

        Ok(order)
    }

    pub async fn list(state: &AppState) -> Result<Vec<Order>, ApiError> {
        state.store.find_all_orders().await
    }

    pub async fn get(state: &AppState, id: i32) -> Result<Order, ApiError> {
        state
            .store
            .find_order_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Order {} not found", id)))
    }
}
