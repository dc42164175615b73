mod common;

use common::fixtures::{seed_order, seed_pending_payment};
use lipa_core::stores::{
    CallbackEventStore, OrderStore, OrderSync, OrderTransition, PaymentStore, PendingPayment,
    SettleOutcome, SettlementStore,
};
use lipa_core::InMemoryStore;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::callback_event::NewCallbackEvent;
use lipa_primitives::models::entities::enum_types::{CallbackOutcome, OrderStatus, PaymentStatus};
use lipa_primitives::models::entities::payment::{PaymentPatch, METHOD_MPESA_STK};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn test_duplicate_checkout_request_id_is_rejected() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;

    let err = store
        .create_pending_payment(PendingPayment {
            order_id: order.id,
            user_id: None,
            amount: dec!(500),
            method: METHOD_MPESA_STK.to_string(),
            checkout_request_id: "abc123".to_string(),
            merchant_request_id: "m-2".to_string(),
        })
        .await
        .unwrap_err();

    assert!(err.is_unique_violation());
    assert_eq!(store.find_all_payments().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_payment_for_unknown_order_is_rejected() {
    let store = InMemoryStore::new();

    let err = store
        .create_pending_payment(PendingPayment {
            order_id: 42,
            user_id: None,
            amount: dec!(10),
            method: METHOD_MPESA_STK.to_string(),
            checkout_request_id: "abc123".to_string(),
            merchant_request_id: "m-1".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Database(_)));
    assert!(!err.is_unique_violation());
}

#[tokio::test]
async fn test_pending_payment_starts_pending() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    let payment = seed_pending_payment(&store, &order, "abc123").await;

    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.order_id, order.id);
    assert_eq!(payment.checkout_request_id.as_deref(), Some("abc123"));
    assert_eq!(payment.merchant_request_id.as_deref(), Some("merchant-abc123"));

    let found = store
        .find_payment_by_checkout_id("abc123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, payment);
}

#[tokio::test]
async fn test_status_only_patch_leaves_other_fields() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;

    store
        .update_payment_by_checkout_id(
            "abc123",
            PaymentPatch {
                mpesa_receipt_number: Some("R1".into()),
                phone_number: Some("254700000000".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    let updated = store
        .update_payment_by_checkout_id(
            "abc123",
            PaymentPatch {
                status: Some(PaymentStatus::Failed),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, PaymentStatus::Failed);
    assert_eq!(updated.mpesa_receipt_number.as_deref(), Some("R1"));
    assert_eq!(updated.phone_number.as_deref(), Some("254700000000"));
    assert_eq!(updated.amount, dec!(500));
    assert_eq!(updated.error_description, None);
}

#[tokio::test]
async fn test_empty_patch_updates_nothing() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    let before = seed_pending_payment(&store, &order, "abc123").await;

    let result = store
        .update_payment_by_checkout_id("abc123", PaymentPatch::default())
        .await
        .unwrap();
    assert_eq!(result, None);

    let after = store.find_payment_by_id(before.id).await.unwrap().unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_order_updates_on_missing_id_return_none() {
    let store = InMemoryStore::new();

    assert_eq!(
        store
            .update_order_status(404, OrderStatus::Cancelled)
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        store
            .update_order_status_with_receipt_ref(404, OrderStatus::Paid, "R1", "R1-1")
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        store
            .update_payment_status_by_id(404, PaymentStatus::Completed)
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_listings_are_newest_first() {
    let store = InMemoryStore::new();
    let first = seed_order(&store, dec!(100)).await;
    let second = seed_order(&store, dec!(200)).await;
    seed_pending_payment(&store, &first, "a").await;
    seed_pending_payment(&store, &second, "b").await;

    let orders = store.find_all_orders().await.unwrap();
    assert_eq!(
        orders.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![second.id, first.id]
    );

    let payments = store.find_all_payments().await.unwrap();
    assert_eq!(payments[0].checkout_request_id.as_deref(), Some("b"));
    assert_eq!(payments[1].checkout_request_id.as_deref(), Some("a"));
}

#[tokio::test]
async fn test_settle_reports_skipped_order() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;
    store
        .update_order_status(order.id, OrderStatus::Paid)
        .await
        .unwrap();

    let outcome = store
        .settle(
            "abc123",
            PaymentPatch {
                status: Some(PaymentStatus::Failed),
                result_code: Some(1032),
                ..Default::default()
            },
            OrderTransition::MarkPaymentFailed,
        )
        .await
        .unwrap()
        .unwrap();

    let SettleOutcome::Settled(settlement) = outcome else {
        panic!("expected the payment to settle, got {:?}", outcome);
    };
    assert_eq!(settlement.payment.status, PaymentStatus::Failed);
    match settlement.order {
        OrderSync::Skipped(order) => assert_eq!(order.status, OrderStatus::Paid),
        other => panic!("expected the order to be skipped, got {:?}", other),
    }
}

#[tokio::test]
async fn test_settle_refuses_to_flip_a_terminal_payment() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    let pending = seed_pending_payment(&store, &order, "abc123").await;
    store
        .update_payment_by_checkout_id(
            "abc123",
            PaymentPatch {
                status: Some(PaymentStatus::Completed),
                mpesa_receipt_number: Some("R1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    let outcome = store
        .settle(
            "abc123",
            PaymentPatch {
                status: Some(PaymentStatus::Failed),
                result_code: Some(1032),
                ..Default::default()
            },
            OrderTransition::MarkPaymentFailed,
        )
        .await
        .unwrap()
        .unwrap();

    match outcome {
        SettleOutcome::AlreadySettled(payment) => {
            assert_eq!(payment.id, pending.id);
            assert_eq!(payment.status, PaymentStatus::Completed);
        }
        other => panic!("expected the payment to be left alone, got {:?}", other),
    }

    let payment = store.find_payment_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.result_code, None);
    assert_eq!(payment.mpesa_receipt_number.as_deref(), Some("R1"));
}

#[tokio::test]
async fn test_settle_reapplies_the_same_terminal_status() {
    let store = InMemoryStore::new();
    let order = seed_order(&store, dec!(500)).await;
    seed_pending_payment(&store, &order, "abc123").await;
    let patch = PaymentPatch {
        status: Some(PaymentStatus::Failed),
        result_code: Some(1032),
        ..Default::default()
    };

    for _ in 0..2 {
        let outcome = store
            .settle("abc123", patch.clone(), OrderTransition::MarkPaymentFailed)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(outcome, SettleOutcome::Settled(_)));
    }
}

#[tokio::test]
async fn test_settle_without_match_returns_none() {
    let store = InMemoryStore::new();

    let settlement = store
        .settle(
            "missing",
            PaymentPatch {
                status: Some(PaymentStatus::Completed),
                ..Default::default()
            },
            OrderTransition::MarkPaid {
                receipt: "R1".into(),
                transaction_id: "R1-20240101120000".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(settlement, None);
}

#[tokio::test]
async fn test_callback_events_newest_first_with_limit() {
    let store = InMemoryStore::new();
    for n in 0..3 {
        let mut event = NewCallbackEvent::new(CallbackOutcome::NoMatchingPayment, json!({ "n": n }));
        event.checkout_request_id = Some(format!("ws_CO_{}", n));
        store.record_callback_event(event).await.unwrap();
    }

    let events = store.find_recent_callback_events(2).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].checkout_request_id.as_deref(), Some("ws_CO_2"));
    assert_eq!(events[1].checkout_request_id.as_deref(), Some("ws_CO_1"));
    assert_eq!(events[0].outcome, "no_matching_payment");
}
