use chrono::Utc;
use lipa_core::stores::{OrderStore, PaymentStore, PendingPayment};
use lipa_core::InMemoryStore;
use lipa_primitives::models::entities::enum_types::PaymentStatus;
use lipa_primitives::models::entities::order::{NewOrder, Order};
use lipa_primitives::models::entities::payment::{Payment, METHOD_MPESA_STK};
use lipa_primitives::models::providers::mpesa::{StkCallback, StkCallbackEnvelope};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub async fn seed_order(store: &InMemoryStore, amount: Decimal) -> Order {
    store
        .create_order(NewOrder {
            customer_name: "Jane Wanjiku".to_string(),
            product: "Term 1 school fees".to_string(),
            amount,
        })
        .await
        .expect("Failed to seed order")
}

pub async fn seed_pending_payment(
    store: &InMemoryStore,
    order: &Order,
    checkout_request_id: &str,
) -> Payment {
    store
        .create_pending_payment(PendingPayment {
            order_id: order.id,
            user_id: None,
            amount: order.amount,
            method: METHOD_MPESA_STK.to_string(),
            checkout_request_id: checkout_request_id.to_string(),
            merchant_request_id: format!("merchant-{}", checkout_request_id),
        })
        .await
        .expect("Failed to seed pending payment")
}

/// A pending payment whose order row does not exist.
pub fn orphan_payment(id: i32, order_id: i32, checkout_request_id: &str) -> Payment {
    let now = Utc::now();
    Payment {
        id,
        order_id,
        user_id: None,
        amount: Decimal::new(50000, 2),
        amount_paid: None,
        method: METHOD_MPESA_STK.to_string(),
        status: PaymentStatus::Pending,
        checkout_request_id: Some(checkout_request_id.to_string()),
        merchant_request_id: None,
        mpesa_receipt_number: None,
        transaction_date: None,
        phone_number: None,
        error_description: None,
        result_code: None,
        transaction_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn success_callback_json(
    checkout_request_id: &str,
    amount: Value,
    receipt: &str,
    transaction_date: Value,
    phone_number: Value,
) -> Value {
    json!({
        "Body": {
            "stkCallback": {
                "MerchantRequestID": "29115-34620561-1",
                "CheckoutRequestID": checkout_request_id,
                "ResultCode": 0,
                "ResultDesc": "The service request is processed successfully.",
                "CallbackMetadata": {
                    "Item": [
                        { "Name": "Amount", "Value": amount },
                        { "Name": "MpesaReceiptNumber", "Value": receipt },
                        { "Name": "Balance" },
                        { "Name": "TransactionDate", "Value": transaction_date },
                        { "Name": "PhoneNumber", "Value": phone_number }
                    ]
                }
            }
        }
    })
}

/// Scenario values: 500 paid with receipt `R1` on 2024-01-01 12:00:00 from 254700000000.
pub fn scenario_success_json(checkout_request_id: &str) -> Value {
    success_callback_json(
        checkout_request_id,
        json!(500),
        "R1",
        json!(20240101120000u64),
        json!(254700000000u64),
    )
}

pub fn failure_callback_json(checkout_request_id: &str, result_code: i32, result_desc: &str) -> Value {
    json!({
        "Body": {
            "stkCallback": {
                "MerchantRequestID": "29115-34620561-1",
                "CheckoutRequestID": checkout_request_id,
                "ResultCode": result_code,
                "ResultDesc": result_desc
            }
        }
    })
}

pub fn parse_callback(value: Value) -> StkCallback {
    serde_json::from_value::<StkCallbackEnvelope>(value)
        .expect("Invalid callback fixture")
        .body
        .stk_callback
}

pub async fn mount_oauth(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/oauth/v1/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ACCESS_TOKEN_XYZ",
            "expires_in": "3599"
        })))
        .mount(server)
        .await;
}

pub fn stk_ack_json(checkout_request_id: &str, response_code: &str, description: &str) -> Value {
    json!({
        "MerchantRequestID": "29115-34620561-1",
        "CheckoutRequestID": checkout_request_id,
        "ResponseCode": response_code,
        "ResponseDescription": description,
        "CustomerMessage": description
    })
}

pub async fn mount_stk_push(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
