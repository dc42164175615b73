//! Storage ports. Services only talk to these traits; `PgStore` backs them with
//! PostgreSQL and `InMemoryStore` with process memory.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::callback_event::{CallbackEvent, NewCallbackEvent};
use lipa_primitives::models::entities::enum_types::{OrderStatus, PaymentStatus};
use lipa_primitives::models::entities::order::{NewOrder, Order};
use lipa_primitives::models::entities::payment::{NewPayment, Payment, PaymentPatch};
use rust_decimal::Decimal;

pub use in_memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, new_order: NewOrder) -> Result<Order, ApiError>;

    /// Newest first.
    async fn find_all_orders(&self) -> Result<Vec<Order>, ApiError>;

    async fn find_order_by_id(&self, id: i32) -> Result<Option<Order>, ApiError>;

    /// `None` when no order has this id.
    async fn update_order_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<Option<Order>, ApiError>;

    async fn update_order_status_with_receipt_ref(
        &self,
        id: i32,
        status: OrderStatus,
        receipt: &str,
        transaction_id: &str,
    ) -> Result<Option<Order>, ApiError>;
}

/// A payment the gateway has accepted and which now waits for its callback.
#[derive(Debug, Clone)]
pub struct PendingPayment {
    pub order_id: i32,
    pub user_id: Option<i32>,
    pub amount: Decimal,
    pub method: String,
    pub checkout_request_id: String,
    pub merchant_request_id: String,
}

impl From<PendingPayment> for NewPayment {
    fn from(pending: PendingPayment) -> Self {
        NewPayment {
            order_id: pending.order_id,
            user_id: pending.user_id,
            amount: pending.amount,
            method: pending.method,
            status: PaymentStatus::Pending,
            checkout_request_id: Some(pending.checkout_request_id),
            merchant_request_id: Some(pending.merchant_request_id),
        }
    }
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Fails with a unique violation when `checkout_request_id` is already taken.
    async fn create_payment(&self, new_payment: NewPayment) -> Result<Payment, ApiError>;

    async fn create_pending_payment(&self, pending: PendingPayment) -> Result<Payment, ApiError> {
        self.create_payment(pending.into()).await
    }

    async fn find_payment_by_checkout_id(
        &self,
        checkout_request_id: &str,
    ) -> Result<Option<Payment>, ApiError>;

    /// Sparse update. `None` when nothing matched or the patch was empty.
    async fn update_payment_by_checkout_id(
        &self,
        checkout_request_id: &str,
        patch: PaymentPatch,
    ) -> Result<Option<Payment>, ApiError>;

    async fn find_payment_by_id(&self, id: i32) -> Result<Option<Payment>, ApiError>;

    /// Newest first.
    async fn find_all_payments(&self) -> Result<Vec<Payment>, ApiError>;

    async fn update_payment_status_by_id(
        &self,
        id: i32,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, ApiError>;
}

/// What a settled payment means for its order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderTransition {
    MarkPaid {
        receipt: String,
        transaction_id: String,
    },
    MarkPaymentFailed,
}

impl OrderTransition {
    pub fn target_status(&self) -> OrderStatus {
        match self {
            OrderTransition::MarkPaid { .. } => OrderStatus::Paid,
            OrderTransition::MarkPaymentFailed => OrderStatus::PaymentFailed,
        }
    }

    /// A paid order is never pulled back to `payment_failed` by a sibling attempt.
    pub fn is_blocked_for(&self, current: OrderStatus) -> bool {
        matches!(self, OrderTransition::MarkPaymentFailed) && current == OrderStatus::Paid
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderSync {
    Updated { order: Order, previous: OrderStatus },
    Missing,
    Skipped(Order),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub payment: Payment,
    pub order: OrderSync,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettleOutcome {
    Settled(Settlement),
    /// The payment already reached a different terminal status. Nothing was written.
    AlreadySettled(Payment),
}

/// A terminal payment only takes its own terminal status again, so a redelivered
/// callback is re-applied but a contradicting one is refused.
pub fn accepts_patch(current: &Payment, patch: &PaymentPatch) -> bool {
    match patch.status {
        Some(next) if current.status.is_terminal() => next == current.status,
        _ => true,
    }
}

#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Applies `patch` to the payment owning `checkout_request_id` and moves its
    /// order per `transition`, in one consistency boundary. The order half is
    /// best-effort: its failure is reported in [`OrderSync`] and does not undo
    /// the payment write. `None` when no payment matched or the patch was empty.
    async fn settle(
        &self,
        checkout_request_id: &str,
        patch: PaymentPatch,
        transition: OrderTransition,
    ) -> Result<Option<SettleOutcome>, ApiError>;
}

#[async_trait]
pub trait CallbackEventStore: Send + Sync {
    async fn record_callback_event(
        &self,
        event: NewCallbackEvent,
    ) -> Result<CallbackEvent, ApiError>;

    async fn find_recent_callback_events(&self, limit: i64) -> Result<Vec<CallbackEvent>, ApiError>;
}

#[async_trait]
pub trait Datastore: OrderStore + PaymentStore + SettlementStore + CallbackEventStore {
    async fn ping(&self) -> Result<(), ApiError>;
}
