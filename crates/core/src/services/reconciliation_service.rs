//! Matches an STK callback to the payment it settles and moves the payment and
//! its order to their terminal states.

use crate::stores::{OrderSync, OrderTransition, SettleOutcome, Settlement, SettlementStore};
use chrono::Utc;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::enum_types::{CallbackOutcome, OrderStatus, PaymentStatus};
use lipa_primitives::models::entities::payment::{Payment, PaymentPatch};
use lipa_primitives::models::providers::mpesa::{
    StkCallback, ITEM_AMOUNT, ITEM_PHONE_NUMBER, ITEM_RECEIPT, ITEM_TRANSACTION_DATE,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationResult {
    Completed(Payment),
    Failed(Payment),
    /// The payment had already settled the other way; it was left as it is.
    AlreadySettled(Payment),
    /// No payment owns the callback's `CheckoutRequestID`. Nothing was written.
    NoMatchingPayment,
}

impl ReconciliationResult {
    pub fn payment(&self) -> Option<&Payment> {
        match self {
            ReconciliationResult::Completed(p)
            | ReconciliationResult::Failed(p)
            | ReconciliationResult::AlreadySettled(p) => Some(p),
            ReconciliationResult::NoMatchingPayment => None,
        }
    }

    pub fn outcome(&self) -> CallbackOutcome {
        match self {
            ReconciliationResult::Completed(_) => CallbackOutcome::Completed,
            ReconciliationResult::Failed(_) => CallbackOutcome::Failed,
            ReconciliationResult::AlreadySettled(_) => CallbackOutcome::AlreadySettled,
            ReconciliationResult::NoMatchingPayment => CallbackOutcome::NoMatchingPayment,
        }
    }
}

pub struct ReconciliationService;

impl ReconciliationService {
    pub async fn reconcile<S>(
        store: &S,
        callback: &StkCallback,
    ) -> Result<ReconciliationResult, ApiError>
    where
        S: SettlementStore + ?Sized,
    {
        let checkout_request_id = callback.checkout_request_id.as_str();

        let (patch, transition) = if callback.is_success() {
            success_update(callback)?
        } else {
            failure_update(callback)
        };

        let Settlement { payment, order } =
            match store.settle(checkout_request_id, patch, transition).await? {
                Some(SettleOutcome::Settled(settlement)) => settlement,
                Some(SettleOutcome::AlreadySettled(payment)) => {
                    warn!(
                        checkout_request_id,
                        payment_id = payment.id,
                        status = %payment.status,
                        result_code = callback.result_code,
                        "Callback contradicts a settled payment, ignoring"
                    );
                    return Ok(ReconciliationResult::AlreadySettled(payment));
                }
                None => {
                    warn!(
                        checkout_request_id,
                        result_code = callback.result_code,
                        "No payment found for callback"
                    );
                    return Ok(ReconciliationResult::NoMatchingPayment);
                }
            };

        log_order_sync(&payment, &order);

        if callback.is_success() {
            info!(
                checkout_request_id,
                payment_id = payment.id,
                order_id = payment.order_id,
                receipt = payment.mpesa_receipt_number.as_deref().unwrap_or_default(),
                "Payment completed"
            );
            Ok(ReconciliationResult::Completed(payment))
        } else {
            info!(
                checkout_request_id,
                payment_id = payment.id,
                order_id = payment.order_id,
                result_code = callback.result_code,
                result_desc = %callback.result_desc,
                "Payment failed"
            );
            Ok(ReconciliationResult::Failed(payment))
        }
    }
}

/// `"{receipt}-{transactionDate}"`, stored on both the payment and its order.
pub fn derive_transaction_id(receipt: &str, transaction_date: &str) -> String {
    format!("{}-{}", receipt, transaction_date)
}

fn success_update(callback: &StkCallback) -> Result<(PaymentPatch, OrderTransition), ApiError> {
    let receipt = callback.metadata_value(ITEM_RECEIPT).ok_or_else(|| {
        ApiError::Callback(format!(
            "Successful callback {} carries no {}",
            callback.checkout_request_id, ITEM_RECEIPT
        ))
    })?;
    let transaction_date = callback.metadata_value(ITEM_TRANSACTION_DATE).ok_or_else(|| {
        ApiError::Callback(format!(
            "Successful callback {} carries no {}",
            callback.checkout_request_id, ITEM_TRANSACTION_DATE
        ))
    })?;

    let amount_paid = callback
        .metadata_value(ITEM_AMOUNT)
        .and_then(|raw| match Decimal::from_str(&raw) {
            Ok(amount) => Some(amount),
            Err(e) => {
                warn!(
                    checkout_request_id = %callback.checkout_request_id,
                    amount = %raw,
                    error = %e,
                    "Ignoring unparseable callback amount"
                );
                None
            }
        });

    let transaction_id = derive_transaction_id(&receipt, &transaction_date);

    let patch = PaymentPatch {
        status: Some(PaymentStatus::Completed),
        mpesa_receipt_number: Some(receipt.clone()),
        amount_paid,
        transaction_date: Some(transaction_date),
        phone_number: callback.metadata_value(ITEM_PHONE_NUMBER),
        transaction_id: Some(transaction_id.clone()),
        updated_at: Some(Utc::now()),
        ..Default::default()
    };

    Ok((
        patch,
        OrderTransition::MarkPaid {
            receipt,
            transaction_id,
        },
    ))
}

fn failure_update(callback: &StkCallback) -> (PaymentPatch, OrderTransition) {
    let patch = PaymentPatch {
        status: Some(PaymentStatus::Failed),
        error_description: Some(callback.result_desc.clone()),
        result_code: Some(callback.result_code),
        updated_at: Some(Utc::now()),
        ..Default::default()
    };

    (patch, OrderTransition::MarkPaymentFailed)
}

fn log_order_sync(payment: &Payment, sync: &OrderSync) {
    match sync {
        OrderSync::Updated { order, previous } => {
            if *previous == OrderStatus::Paid && order.status == OrderStatus::Paid {
                warn!(
                    order_id = order.id,
                    payment_id = payment.id,
                    transaction_id = order.transaction_id.as_deref().unwrap_or_default(),
                    "Order was already paid; receipt reference overwritten by a later payment"
                );
            } else {
                info!(order_id = order.id, from = %previous, to = %order.status, "Order status updated");
            }
        }
        OrderSync::Skipped(order) => {
            info!(
                order_id = order.id,
                payment_id = payment.id,
                status = %order.status,
                "Order left unchanged"
            );
        }
        OrderSync::Missing => {
            error!(
                order_id = payment.order_id,
                payment_id = payment.id,
                "Payment settled but its order does not exist"
            );
        }
        OrderSync::Failed(reason) => {
            error!(
                order_id = payment.order_id,
                payment_id = payment.id,
                reason = %reason,
                "Payment settled but its order could not be updated"
            );
        }
    }
}
