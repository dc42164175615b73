use chrono::Utc;
use diesel::prelude::*;
use lipa_primitives::error::ApiError;
use lipa_primitives::models::entities::enum_types::PaymentStatus;
use lipa_primitives::models::entities::payment::{NewPayment, Payment, PaymentPatch};
use lipa_primitives::schema::payments;
use tracing::debug;

pub struct PaymentRepository;

impl PaymentRepository {
    pub fn create(conn: &mut PgConnection, new_payment: NewPayment) -> Result<Payment, ApiError> {
        diesel::insert_into(payments::table)
            .values(&new_payment)
            .get_result::<Payment>(conn)
            .map_err(ApiError::Database)
    }

    pub fn find_all(conn: &mut PgConnection) -> Result<Vec<Payment>, ApiError> {
        payments::table
            .order((payments::created_at.desc(), payments::id.desc()))
            .load::<Payment>(conn)
            .map_err(ApiError::Database)
    }

    pub fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Payment>, ApiError> {
        payments::table
            .find(id)
            .first::<Payment>(conn)
            .optional()
            .map_err(ApiError::Database)
    }

    pub fn find_by_checkout_request_id(
        conn: &mut PgConnection,
        checkout_request_id: &str,
    ) -> Result<Option<Payment>, ApiError> {
        payments::table
            .filter(payments::checkout_request_id.eq(checkout_request_id))
            .first::<Payment>(conn)
            .optional()
            .map_err(ApiError::Database)
    }

    pub fn find_by_checkout_request_id_for_update(
        conn: &mut PgConnection,
        checkout_request_id: &str,
    ) -> Result<Option<Payment>, ApiError> {
        payments::table
            .filter(payments::checkout_request_id.eq(checkout_request_id))
            .for_update()
            .first::<Payment>(conn)
            .optional()
            .map_err(ApiError::Database)
    }

    /// Writes only the fields present in `patch`. An empty patch touches nothing and returns `None`.
    pub fn update_by_checkout_request_id(
        conn: &mut PgConnection,
        checkout_request_id: &str,
        patch: &PaymentPatch,
    ) -> Result<Option<Payment>, ApiError> {
        if patch.is_empty() {
            debug!(checkout_request_id, "Empty payment patch, nothing to update");
            return Ok(None);
        }

        let patch = patch.clone().stamped(Utc::now());

        diesel::update(payments::table)
            .filter(payments::checkout_request_id.eq(checkout_request_id))
            .set(&patch)
            .get_result::<Payment>(conn)
            .optional()
            .map_err(ApiError::Database)
    }

    pub fn update_status(
        conn: &mut PgConnection,
        id: i32,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, ApiError> {
        diesel::update(payments::table.find(id))
            .set((
                payments::status.eq(status),
                payments::updated_at.eq(Utc::now()),
            ))
            .get_result::<Payment>(conn)
            .optional()
            .map_err(ApiError::Database)
    }
}
