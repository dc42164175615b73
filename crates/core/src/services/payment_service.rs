use crate::app_state::AppState;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::dtos::payment_dto::{CreatePaymentRequest, UpdatePaymentStatusRequest};
use lipa_primitives::models::entities::enum_types::PaymentStatus;
use lipa_primitives::models::entities::payment::{NewPayment, Payment};
use tracing::info;
use validator::Validate;

pub struct PaymentService;

impl PaymentService {
    /// Records a payment taken outside the gateway (cash, bank transfer, ...).
    pub async fn create(state: &AppState, req: CreatePaymentRequest) -> Result<Payment, ApiError> {
        req.validate()?;

        let (Some(order_id), Some(amount), Some(method)) = (req.order_id, req.amount, req.method)
        else {
            return Err(ApiError::BadRequest(
                "order_id, amount and method are required".into(),
            ));
        };

        if state.store.find_order_by_id(order_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("Order {} not found", order_id)));
        }

        let payment = state
            .store
            .create_payment(NewPayment {
                order_id,
                user_id: None,
                amount,
                method: method.trim().to_string(),
                status: PaymentStatus::Initiated,
                checkout_request_id: None,
                merchant_request_id: None,
            })
            .await?;

        info!(payment_id = payment.id, order_id, "Manual payment recorded");

        Ok(payment)
    }

    pub async fn list(state: &AppState) -> Result<Vec<Payment>, ApiError> {
        state.store.find_all_payments().await
    }

    pub async fn get(state: &AppState, id: i32) -> Result<Payment, ApiError> {
        state
            .store
            .find_payment_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Payment {} not found", id)))
    }

    pub async fn update_status(
        state: &AppState,
        id: i32,
        req: UpdatePaymentStatusRequest,
    ) -> Result<Payment, ApiError> {
        let payment = state
            .store
            .update_payment_status_by_id(id, req.status)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Payment {} not found", id)))?;

        info!(payment_id = id, status = %payment.status, "Payment status updated");

        Ok(payment)
    }
}
