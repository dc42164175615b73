mod common;

use common::fixtures::{
    failure_callback_json, orphan_payment, parse_callback, scenario_success_json,
    seed_order, seed_pending_payment, success_callback_json,
};
use lipa_core::services::reconciliation_service::{
    derive_transaction_id, ReconciliationResult, ReconciliationService,
};
use lipa_core::stores::{OrderStore, PaymentStore};
use lipa_core::InMemoryStore;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::enum_types::{CallbackOutcome, OrderStatus, PaymentStatus};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn test_success_callback_completes_payment_and_pays_order() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;

    let callback = parse_callback(scenario_success_json("abc123"));
    let result = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap();

    let payment = match &result {
        ReconciliationResult::Completed(payment) => payment.clone(),
        other => panic!("expected a completed payment, got {:?}", other),
    };
    assert_eq!(result.outcome(), CallbackOutcome::Completed);
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount_paid, Some(dec!(500)));
    assert_eq!(payment.mpesa_receipt_number.as_deref(), Some("R1"));
    assert_eq!(payment.transaction_date.as_deref(), Some("20240101120000"));
    assert_eq!(payment.phone_number.as_deref(), Some("254700000000"));
    assert_eq!(payment.transaction_id.as_deref(), Some("R1-20240101120000"));

    let order = store.find_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.mpesa_receipt_number.as_deref(), Some("R1"));
    assert_eq!(order.transaction_id.as_deref(), Some("R1-20240101120000"));
    assert_eq!(order.amount, dec!(500));
}

#[tokio::test]
async fn test_failure_callback_fails_payment_and_order() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;

    let callback = parse_callback(failure_callback_json(
        "abc123",
        1032,
        "Request cancelled by user",
    ));
    let result = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap();

    assert_eq!(result.outcome(), CallbackOutcome::Failed);
    let payment = result.payment().unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert_eq!(payment.result_code, Some(1032));
    assert_eq!(
        payment.error_description.as_deref(),
        Some("Request cancelled by user")
    );
    assert_eq!(payment.mpesa_receipt_number, None);
    assert_eq!(payment.amount_paid, None);

    let order = store.find_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::PaymentFailed);
    assert_eq!(order.transaction_id, None);
}

#[tokio::test]
async fn test_unknown_checkout_id_changes_nothing() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    let before = seed_pending_payment(&store, &order, "abc123").await;

    let callback = parse_callback(scenario_success_json("unknown-id"));
    let result = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap();

    assert_eq!(result, ReconciliationResult::NoMatchingPayment);
    assert_eq!(result.payment(), None);

    let after = store.find_payment_by_id(before.id).await.unwrap().unwrap();
    assert_eq!(after, before);
    let order_after = store.find_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(order_after, order);
}

#[tokio::test]
async fn test_unknown_checkout_id_on_failure_is_a_no_op() {
    let store = InMemoryStore::new();

    let callback = parse_callback(failure_callback_json("nobody", 1, "Insufficient funds"));
    let result = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap();

    assert_eq!(result, ReconciliationResult::NoMatchingPayment);
    assert!(store.find_all_payments().await.unwrap().is_empty());
}

#[test]
fn test_derived_transaction_id_format() {
    assert_eq!(
        derive_transaction_id("QKL3ABC9XY", "20240101120000"),
        "QKL3ABC9XY-20240101120000"
    );
}

#[tokio::test]
async fn test_string_valued_metadata_is_accepted() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(1.50)).await;
    seed_pending_payment(&store, &order, "ws_CO_1").await;

    let callback = parse_callback(success_callback_json(
        "ws_CO_1",
        json!("1.50"),
        "QKL3ABC9XY",
        json!("20240315093000"),
        json!("254708374149"),
    ));
    let result = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap();

    let payment = result.payment().unwrap();
    assert_eq!(payment.amount_paid, Some(dec!(1.50)));
    assert_eq!(
        payment.transaction_id.as_deref(),
        Some("QKL3ABC9XY-20240315093000")
    );
}

#[tokio::test]
async fn test_unparseable_amount_is_left_unset() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;

    let callback = parse_callback(success_callback_json(
        "abc123",
        json!("five hundred"),
        "R1",
        json!(20240101120000u64),
        json!(254700000000u64),
    ));
    let result = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap();

    let payment = result.payment().unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount_paid, None);
    assert_eq!(payment.mpesa_receipt_number.as_deref(), Some("R1"));
}

#[tokio::test]
async fn test_success_without_receipt_is_rejected_untouched() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    let before = seed_pending_payment(&store, &order, "abc123").await;

    let callback = parse_callback(json!({
        "Body": {
            "stkCallback": {
                "CheckoutRequestID": "abc123",
                "ResultCode": 0,
                "ResultDesc": "The service request is processed successfully.",
                "CallbackMetadata": {
                    "Item": [
                        { "Name": "Amount", "Value": 500 },
                        { "Name": "TransactionDate", "Value": 20240101120000u64 }
                    ]
                }
            }
        }
    }));

    let err = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Callback(_)));

    let after = store.find_payment_by_id(before.id).await.unwrap().unwrap();
    assert_eq!(after, before);
    let order_after = store.find_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(order_after.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_repeated_success_callback_is_idempotent() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;

    let callback = parse_callback(scenario_success_json("abc123"));
    let first = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap();
    let second = ReconciliationService::reconcile(&store, &callback)
        .await
        .unwrap();

    let (first, second) = (first.payment().unwrap(), second.payment().unwrap());
    assert_eq!(first.status, second.status);
    assert_eq!(first.amount_paid, second.amount_paid);
    assert_eq!(first.transaction_id, second.transaction_id);
    assert_eq!(first.mpesa_receipt_number, second.mpesa_receipt_number);

    let order = store.find_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.transaction_id.as_deref(), Some("R1-20240101120000"));
}

#[tokio::test]
async fn test_late_failure_does_not_undo_completed_payment() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;

    ReconciliationService::reconcile(&store, &parse_callback(scenario_success_json("abc123")))
        .await
        .unwrap();
    let result = ReconciliationService::reconcile(
        &store,
        &parse_callback(failure_callback_json("abc123", 1032, "Request cancelled by user")),
    )
    .await
    .unwrap();

    assert_eq!(result.outcome(), CallbackOutcome::AlreadySettled);
    let payment = store
        .find_payment_by_checkout_id("abc123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.result_code, None);
    assert_eq!(payment.error_description, None);
    assert_eq!(payment.transaction_id.as_deref(), Some("R1-20240101120000"));

    let order = store.find_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
}

#[tokio::test]
async fn test_late_success_does_not_undo_failed_payment() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;

    ReconciliationService::reconcile(
        &store,
        &parse_callback(failure_callback_json("abc123", 1032, "Request cancelled by user")),
    )
    .await
    .unwrap();
    let result = ReconciliationService::reconcile(&store, &parse_callback(scenario_success_json("abc123")))
        .await
        .unwrap();

    assert_eq!(result.outcome(), CallbackOutcome::AlreadySettled);
    assert_eq!(result.payment().unwrap().status, PaymentStatus::Failed);

    let order = store.find_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::PaymentFailed);
    assert_eq!(order.transaction_id, None);
}

#[tokio::test]
async fn test_failed_sibling_attempt_does_not_unpay_order() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "first").await;
    seed_pending_payment(&store, &order, "second").await;

    ReconciliationService::reconcile(&store, &parse_callback(scenario_success_json("first")))
        .await
        .unwrap();
    let result = ReconciliationService::reconcile(
        &store,
        &parse_callback(failure_callback_json("second", 1037, "DS timeout user cannot be reached")),
    )
    .await
    .unwrap();

    assert_eq!(result.payment().unwrap().status, PaymentStatus::Failed);

    let order = store.find_order_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.transaction_id.as_deref(), Some("R1-20240101120000"));
}

#[tokio::test]
async fn test_payment_settles_when_order_is_missing() {
    let store = InMemoryStore::new();
    store.seed_payment(orphan_payment(7, 999, "orphan")).await;

    let result = ReconciliationService::reconcile(&store, &parse_callback(scenario_success_json("orphan")))
        .await
        .unwrap();

    let payment = result.payment().unwrap();
    assert_eq!(payment.id, 7);
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(store.find_order_by_id(999).await.unwrap(), None);
}
