use crate::stores::{
    accepts_patch, CallbackEventStore, Datastore, OrderStore, OrderSync, OrderTransition,
    PaymentStore, SettleOutcome, Settlement, SettlementStore,
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::callback_event::{CallbackEvent, NewCallbackEvent};
use lipa_primitives::models::entities::enum_types::{OrderStatus, PaymentStatus};
use lipa_primitives::models::entities::order::{NewOrder, Order};
use lipa_primitives::models::entities::payment::{NewPayment, Payment, PaymentPatch};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Default)]
struct Tables {
    orders: BTreeMap<i32, Order>,
    payments: BTreeMap<i32, Payment>,
    callback_events: Vec<CallbackEvent>,
    next_order_id: i32,
    next_payment_id: i32,
}

impl Tables {
    fn payment_id_by_checkout(&self, checkout_request_id: &str) -> Option<i32> {
        self.payments
            .values()
            .find(|p| p.checkout_request_id.as_deref() == Some(checkout_request_id))
            .map(|p| p.id)
    }

    fn patch_payment(&mut self, checkout_request_id: &str, patch: &PaymentPatch) -> Option<Payment> {
        if patch.is_empty() {
            debug!(checkout_request_id, "Empty payment patch, nothing to update");
            return None;
        }

        let id = self.payment_id_by_checkout(checkout_request_id)?;
        let payment = self.payments.get_mut(&id)?;
        patch.clone().stamped(Utc::now()).apply_to(payment);
        Some(payment.clone())
    }

    fn set_order_status(
        &mut self,
        id: i32,
        status: OrderStatus,
        receipt_ref: Option<(&str, &str)>,
    ) -> Option<Order> {
        let order = self.orders.get_mut(&id)?;
        order.status = status;
        if let Some((receipt, transaction_id)) = receipt_ref {
            order.mpesa_receipt_number = Some(receipt.to_string());
            order.transaction_id = Some(transaction_id.to_string());
        }
        Some(order.clone())
    }
}

/// Process-local store with the same contract as [`PgStore`](crate::stores::PgStore).
/// One lock guards every table, so a settlement is applied as a unit.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a payment row as-is, skipping the order reference check.
    /// For loading fixtures or rows imported from elsewhere.
    pub async fn seed_payment(&self, payment: Payment) {
        let mut tables = self.tables.write().await;
        tables.next_payment_id = tables.next_payment_id.max(payment.id);
        tables.payments.insert(payment.id, payment);
    }
}

fn constraint_violation(kind: DatabaseErrorKind, message: String) -> ApiError {
    ApiError::Database(DieselError::DatabaseError(kind, Box::new(message)))
}

fn newest_first<T, F>(rows: &mut [T], key: F)
where
    F: Fn(&T) -> (chrono::DateTime<Utc>, i64),
{
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn create_order(&self, new_order: NewOrder) -> Result<Order, ApiError> {
        let mut tables = self.tables.write().await;
        tables.next_order_id += 1;

        let order = Order {
            id: tables.next_order_id,
            customer_name: new_order.customer_name,
            product: new_order.product,
            amount: new_order.amount,
            status: OrderStatus::Pending,
            transaction_id: None,
            mpesa_receipt_number: None,
            created_at: Utc::now(),
        };
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables.orders.values().cloned().collect();
        newest_first(&mut orders, |o| (o.created_at, o.id as i64));
        Ok(orders)
    }

    async fn find_order_by_id(&self, id: i32) -> Result<Option<Order>, ApiError> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn update_order_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<Option<Order>, ApiError> {
        Ok(self.tables.write().await.set_order_status(id, status, None))
    }

    async fn update_order_status_with_receipt_ref(
        &self,
        id: i32,
        status: OrderStatus,
        receipt: &str,
        transaction_id: &str,
    ) -> Result<Option<Order>, ApiError> {
        Ok(self
            .tables
            .write()
            .await
            .set_order_status(id, status, Some((receipt, transaction_id))))
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn create_payment(&self, new_payment: NewPayment) -> Result<Payment, ApiError> {
        let mut tables = self.tables.write().await;

        if !tables.orders.contains_key(&new_payment.order_id) {
            return Err(constraint_violation(
                DatabaseErrorKind::ForeignKeyViolation,
                format!(
                    "insert or update on table \"payments\" violates foreign key constraint \"payments_order_id_fkey\" (order_id={})",
                    new_payment.order_id
                ),
            ));
        }

        if let Some(checkout_request_id) = new_payment.checkout_request_id.as_deref() {
            if tables.payment_id_by_checkout(checkout_request_id).is_some() {
                return Err(constraint_violation(
                    DatabaseErrorKind::UniqueViolation,
                    format!(
                        "duplicate key value violates unique constraint \"payments_checkout_request_id_key\" (checkout_request_id={})",
                        checkout_request_id
                    ),
                ));
            }
        }

        tables.next_payment_id += 1;
        let now = Utc::now();
        let payment = Payment {
            id: tables.next_payment_id,
            order_id: new_payment.order_id,
            user_id: new_payment.user_id,
            amount: new_payment.amount,
            amount_paid: None,
            method: new_payment.method,
            status: new_payment.status,
            checkout_request_id: new_payment.checkout_request_id,
            merchant_request_id: new_payment.merchant_request_id,
            mpesa_receipt_number: None,
            transaction_date: None,
            phone_number: None,
            error_description: None,
            result_code: None,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn find_payment_by_checkout_id(
        &self,
        checkout_request_id: &str,
    ) -> Result<Option<Payment>, ApiError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payment_id_by_checkout(checkout_request_id)
            .and_then(|id| tables.payments.get(&id).cloned()))
    }

    async fn update_payment_by_checkout_id(
        &self,
        checkout_request_id: &str,
        patch: PaymentPatch,
    ) -> Result<Option<Payment>, ApiError> {
        Ok(self
            .tables
            .write()
            .await
            .patch_payment(checkout_request_id, &patch))
    }

    async fn find_payment_by_id(&self, id: i32) -> Result<Option<Payment>, ApiError> {
        Ok(self.tables.read().await.payments.get(&id).cloned())
    }

    async fn find_all_payments(&self) -> Result<Vec<Payment>, ApiError> {
        let tables = self.tables.read().await;
        let mut payments: Vec<Payment> = tables.payments.values().cloned().collect();
        newest_first(&mut payments, |p| (p.created_at, p.id as i64));
        Ok(payments)
    }

    async fn update_payment_status_by_id(
        &self,
        id: i32,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, ApiError> {
        let mut tables = self.tables.write().await;
        Ok(tables.payments.get_mut(&id).map(|payment| {
            payment.status = status;
            payment.updated_at = Utc::now();
            payment.clone()
        }))
    }
}

#[async_trait]
impl SettlementStore for InMemoryStore {
    async fn settle(
        &self,
        checkout_request_id: &str,
        patch: PaymentPatch,
        transition: OrderTransition,
    ) -> Result<Option<SettleOutcome>, ApiError> {
        let mut tables = self.tables.write().await;

        let Some(current) = tables
            .payment_id_by_checkout(checkout_request_id)
            .and_then(|id| tables.payments.get(&id))
        else {
            return Ok(None);
        };
        if !accepts_patch(current, &patch) {
            warn!(
                checkout_request_id,
                payment_id = current.id,
                status = %current.status,
                "Payment already settled, refusing a conflicting status"
            );
            return Ok(Some(SettleOutcome::AlreadySettled(current.clone())));
        }

        let Some(payment) = tables.patch_payment(checkout_request_id, &patch) else {
            return Ok(None);
        };

        let order = match tables.orders.get(&payment.order_id).cloned() {
            None => OrderSync::Missing,
            Some(current) if transition.is_blocked_for(current.status) => {
                OrderSync::Skipped(current)
            }
            Some(current) => {
                let receipt_ref = match &transition {
                    OrderTransition::MarkPaid {
                        receipt,
                        transaction_id,
                    } => Some((receipt.as_str(), transaction_id.as_str())),
                    OrderTransition::MarkPaymentFailed => None,
                };
                match tables.set_order_status(
                    payment.order_id,
                    transition.target_status(),
                    receipt_ref,
                ) {
                    Some(order) => OrderSync::Updated {
                        order,
                        previous: current.status,
                    },
                    None => OrderSync::Missing,
                }
            }
        };

        Ok(Some(SettleOutcome::Settled(Settlement { payment, order })))
    }
}

#[async_trait]
impl CallbackEventStore for InMemoryStore {
    async fn record_callback_event(
        &self,
        event: NewCallbackEvent,
    ) -> Result<CallbackEvent, ApiError> {
        let mut tables = self.tables.write().await;
        let recorded = CallbackEvent {
            id: tables.callback_events.len() as i64 + 1,
            checkout_request_id: event.checkout_request_id,
            result_code: event.result_code,
            outcome: event.outcome,
            detail: event.detail,
            payload: event.payload,
            received_at: Utc::now(),
        };
        tables.callback_events.push(recorded.clone());
        Ok(recorded)
    }

    async fn find_recent_callback_events(&self, limit: i64) -> Result<Vec<CallbackEvent>, ApiError> {
        let tables = self.tables.read().await;
        let mut events = tables.callback_events.clone();
        newest_first(&mut events, |e| (e.received_at, e.id));
        events.truncate(limit.max(0) as usize);
        Ok(events)
    }
}

#[async_trait]
impl Datastore for InMemoryStore {
    async fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
