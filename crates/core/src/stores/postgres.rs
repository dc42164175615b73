use crate::repositories::callback_event_repository::CallbackEventRepository;
use crate::repositories::order_repository::OrderRepository;
use crate::repositories::payment_repository::PaymentRepository;
use crate::stores::{
    accepts_patch, CallbackEventStore, Datastore, OrderStore, OrderSync, OrderTransition,
    PaymentStore, SettleOutcome, Settlement, SettlementStore,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::callback_event::{CallbackEvent, NewCallbackEvent};
use lipa_primitives::models::entities::enum_types::{OrderStatus, PaymentStatus};
use lipa_primitives::models::entities::order::{NewOrder, Order};
use lipa_primitives::models::entities::payment::{NewPayment, Payment, PaymentPatch};
use tracing::warn;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
type DbConn = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PgStore {
    db: DbPool,
}

impl PgStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &DbPool {
        &self.db
    }

    fn conn(&self) -> Result<DbConn, ApiError> {
        self.db
            .get()
            .map_err(|e| ApiError::DatabaseConnection(e.to_string()))
    }

    fn sync_order(
        conn: &mut PgConnection,
        order_id: i32,
        transition: &OrderTransition,
    ) -> Result<OrderSync, ApiError> {
        let Some(current) = OrderRepository::find_by_id_for_update(conn, order_id)? else {
            return Ok(OrderSync::Missing);
        };

        if transition.is_blocked_for(current.status) {
            return Ok(OrderSync::Skipped(current));
        }

        let updated = match transition {
            OrderTransition::MarkPaid {
                receipt,
                transaction_id,
            } => OrderRepository::update_status_with_receipt_ref(
                conn,
                order_id,
                OrderStatus::Paid,
                receipt,
                transaction_id,
            )?,
            OrderTransition::MarkPaymentFailed => {
                OrderRepository::update_status(conn, order_id, OrderStatus::PaymentFailed)?
            }
        };

        Ok(match updated {
            Some(order) => OrderSync::Updated {
                order,
                previous: current.status,
            },
            None => OrderSync::Missing,
        })
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, new_order: NewOrder) -> Result<Order, ApiError> {
        OrderRepository::create(&mut *self.conn()?, new_order)
    }

    async fn find_all_orders(&self) -> Result<Vec<Order>, ApiError> {
        OrderRepository::find_all(&mut *self.conn()?)
    }

    async fn find_order_by_id(&self, id: i32) -> Result<Option<Order>, ApiError> {
        OrderRepository::find_by_id(&mut *self.conn()?, id)
    }

    async fn update_order_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<Option<Order>, ApiError> {
        OrderRepository::update_status(&mut *self.conn()?, id, status)
    }

    async fn update_order_status_with_receipt_ref(
        &self,
        id: i32,
        status: OrderStatus,
        receipt: &str,
        transaction_id: &str,
    ) -> Result<Option<Order>, ApiError> {
        OrderRepository::update_status_with_receipt_ref(
            &mut *self.conn()?,
            id,
            status,
            receipt,
            transaction_id,
        )
    }
}

#[async_trait]
impl PaymentStore for PgStore {
    async fn create_payment(&self, new_payment: NewPayment) -> Result<Payment, ApiError> {
        PaymentRepository::create(&mut *self.conn()?, new_payment)
    }

    async fn find_payment_by_checkout_id(
        &self,
        checkout_request_id: &str,
    ) -> Result<Option<Payment>, ApiError> {
        PaymentRepository::find_by_checkout_request_id(&mut *self.conn()?, checkout_request_id)
    }

    async fn update_payment_by_checkout_id(
        &self,
        checkout_request_id: &str,
        patch: PaymentPatch,
    ) -> Result<Option<Payment>, ApiError> {
        PaymentRepository::update_by_checkout_request_id(
            &mut *self.conn()?,
            checkout_request_id,
            &patch,
        )
    }

    async fn find_payment_by_id(&self, id: i32) -> Result<Option<Payment>, ApiError> {
        PaymentRepository::find_by_id(&mut *self.conn()?, id)
    }

    async fn find_all_payments(&self) -> Result<Vec<Payment>, ApiError> {
        PaymentRepository::find_all(&mut *self.conn()?)
    }

    async fn update_payment_status_by_id(
        &self,
        id: i32,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, ApiError> {
        PaymentRepository::update_status(&mut *self.conn()?, id, status)
    }
}

#[async_trait]
impl SettlementStore for PgStore {
    async fn settle(
        &self,
        checkout_request_id: &str,
        patch: PaymentPatch,
        transition: OrderTransition,
    ) -> Result<Option<SettleOutcome>, ApiError> {
        let mut conn = self.conn()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            let Some(current) =
                PaymentRepository::find_by_checkout_request_id_for_update(conn, checkout_request_id)?
            else {
                return Ok(None);
            };
            if !accepts_patch(&current, &patch) {
                warn!(
                    checkout_request_id,
                    payment_id = current.id,
                    status = %current.status,
                    "Payment already settled, refusing a conflicting status"
                );
                return Ok(Some(SettleOutcome::AlreadySettled(current)));
            }

            let Some(payment) =
                PaymentRepository::update_by_checkout_request_id(conn, checkout_request_id, &patch)?
            else {
                return Ok(None);
            };

            // savepoint: an order-side failure rolls back alone
            let order = match conn.transaction::<_, ApiError, _>(|conn| {
                Self::sync_order(conn, payment.order_id, &transition)
            }) {
                Ok(sync) => sync,
                Err(e) => {
                    warn!(
                        order_id = payment.order_id,
                        error = %e,
                        "Order update rolled back inside settlement"
                    );
                    OrderSync::Failed(e.to_string())
                }
            };

            Ok(Some(SettleOutcome::Settled(Settlement { payment, order })))
        })
    }
}

#[async_trait]
impl CallbackEventStore for PgStore {
    async fn record_callback_event(
        &self,
        event: NewCallbackEvent,
    ) -> Result<CallbackEvent, ApiError> {
        CallbackEventRepository::create(&mut *self.conn()?, event)
    }

    async fn find_recent_callback_events(&self, limit: i64) -> Result<Vec<CallbackEvent>, ApiError> {
        CallbackEventRepository::find_recent(&mut *self.conn()?, limit)
    }
}

#[async_trait]
impl Datastore for PgStore {
    async fn ping(&self) -> Result<(), ApiError> {
        diesel::sql_query("SELECT 1")
            .execute(&mut *self.conn()?)
            .map_err(ApiError::Database)?;
        Ok(())
    }
}
