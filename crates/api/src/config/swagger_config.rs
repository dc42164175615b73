use crate::handlers::{
    callback_events::__path_list_callback_events,
    health::__path_health_check,
    mpesa_callback::__path_mpesa_callback,
    orders::{__path_create_order, __path_get_order, __path_list_orders},
    payments::{
        __path_create_payment, __path_get_payment, __path_list_payments,
        __path_update_payment_status,
    },
    stk_push::__path_stk_push,
};
use lipa_primitives::error::ApiErrorResponse;
use lipa_primitives::models::*;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Lipa", description = "Orders, M-Pesa STK push and callback reconciliation"),
    paths(
        health_check,
        create_order, list_orders, get_order,
        list_payments, get_payment, create_payment, update_payment_status,
        stk_push, mpesa_callback, list_callback_events
    ),
    components(schemas(
        ApiErrorResponse, HealthStatus, Order, OrderStatus, Payment, PaymentStatus,
        CreateOrderRequest, CreatePaymentRequest, UpdatePaymentStatusRequest,
        StkPushRequest, StkPushResponse, StkCallbackEnvelope, CallbackAck, CallbackEvent
    )),
    tags(
        (name = "Health", description = "Liveness and datastore reachability"),
        (name = "Orders", description = "Purchase intents"),
        (name = "Payments", description = "Payment attempts and STK push initiation"),
        (name = "Webhook", description = "M-Pesa callback delivery and audit trail")
    )
)]
pub struct ApiDoc;
