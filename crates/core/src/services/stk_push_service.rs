use crate::app_state::AppState;
use crate::clients::StkPushParams;
use crate::stores::PendingPayment;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::dtos::stk_dto::{StkPushRequest, StkPushResponse};
use lipa_primitives::models::entities::enum_types::OrderStatus;
use lipa_primitives::models::entities::payment::METHOD_MPESA_STK;
use lipa_primitives::utility::normalize_phone_number;
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use validator::Validate;

pub const STK_INITIATED_MESSAGE: &str =
    "STK Push initiated successfully. Awaiting payment confirmation.";

pub struct StkPushService;

impl StkPushService {
    /// Asks the gateway to prompt the payer, then records a `pending` payment
    /// keyed by the returned `CheckoutRequestID`. Nothing is written unless the
    /// gateway accepted the request.
    pub async fn initiate(
        state: &AppState,
        req: StkPushRequest,
    ) -> Result<StkPushResponse, ApiError> {
        let (Some(amount), Some(phone_number), Some(order_id)) =
            (req.amount, req.phone_number.as_deref(), req.order_id)
        else {
            return Err(ApiError::BadRequest(
                "Amount, phone number, and orderId required".into(),
            ));
        };

        req.validate()?;

        let order = state
            .store
            .find_order_by_id(order_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Order {} not found", order_id)))?;

        if order.status == OrderStatus::Paid {
            return Err(ApiError::Conflict(format!(
                "Order {} has already been paid",
                order_id
            )));
        }

        let phone_number = normalize_phone_number(phone_number);
        let account_reference = req
            .account_reference
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(&state.config.mpesa_details.account_reference);

        let ack = state
            .gateway
            .initiate(StkPushParams {
                amount,
                phone_number: &phone_number,
                account_reference,
            })
            .await
            .map_err(|e| {
                error!(order_id, error = %e, "STK push initiation failed");
                ApiError::from(e)
            })?;

        if !ack.is_accepted() {
            warn!(
                order_id,
                response_code = %ack.response_code,
                description = %ack.response_description,
                "STK push rejected by gateway"
            );
            return Err(ApiError::GatewayRejected {
                code: ack.response_code,
                details: ack.response_description,
            });
        }

        let payment = state
            .store
            .create_pending_payment(PendingPayment {
                order_id,
                user_id: req.user_id,
                amount: Decimal::from(amount),
                method: METHOD_MPESA_STK.to_string(),
                checkout_request_id: ack.checkout_request_id.clone(),
                merchant_request_id: ack.merchant_request_id.clone(),
            })
            .await
            .map_err(|e| {
                error!(
                    order_id,
                    checkout_request_id = %ack.checkout_request_id,
                    error = %e,
                    "Gateway accepted STK push but the pending payment could not be stored"
                );
                e
            })?;

        info!(
            payment_id = payment.id,
            order_id,
            checkout_request_id = %ack.checkout_request_id,
            "STK push initiated"
        );

        Ok(StkPushResponse {
            message: STK_INITIATED_MESSAGE.to_string(),
            checkout_request_id: ack.checkout_request_id,
            merchant_request_id: ack.merchant_request_id,
            customer_message: ack.customer_message,
        })
    }
}
