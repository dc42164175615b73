use diesel::prelude::*;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::enum_types::OrderStatus;
use lipa_primitives::models::entities::order::{NewOrder, Order};
use lipa_primitives::schema::orders;

pub struct OrderRepository;

impl OrderRepository {
    pub fn create(conn: &mut PgConnection, new_order: NewOrder) -> Result<Order, ApiError> {
        diesel::insert_into(orders::table)
            .values(&new_order)
            .get_result::<Order>(conn)
            .map_err(ApiError::Database)
    }

    pub fn find_all(conn: &mut PgConnection) -> Result<Vec<Order>, ApiError> {
        orders::table
            .order((orders::created_at.desc(), orders::id.desc()))
            .load::<Order>(conn)
            .map_err(ApiError::Database)
    }

    pub fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Order>, ApiError> {
        orders::table
            .find(id)
            .first::<Order>(conn)
            .optional()
            .map_err(ApiError::Database)
    }

    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<Order>, ApiError> {
        orders::table
            .find(id)
            .for_update()
            .first::<Order>(conn)
            .optional()
            .map_err(ApiError::Database)
    }

    pub fn update_status(
        conn: &mut PgConnection,
        id: i32,
        status: OrderStatus,
    ) -> Result<Option<Order>, ApiError> {
        diesel::update(orders::table.find(id))
            .set(orders::status.eq(status))
            .get_result::<Order>(conn)
            .optional()
            .map_err(ApiError::Database)
    }

    pub fn update_status_with_receipt_ref(
        conn: &mut PgConnection,
        id: i32,
        status: OrderStatus,
        receipt: &str,
        transaction_id: &str,
    ) -> Result<Option<Order>, ApiError> {
        diesel::update(orders::table.find(id))
            .set((
                orders::status.eq(status),
                orders::mpesa_receipt_number.eq(receipt),
                orders::transaction_id.eq(transaction_id),
            ))
            .get_result::<Order>(conn)
            .optional()
            .map_err(ApiError::Database)
    }
}
