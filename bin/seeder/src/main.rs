use diesel::pg::PgConnection;
use diesel::prelude::*;
use dotenvy::dotenv;
use eyre::{eyre, Result};
use lipa_core::repositories::order_repository::OrderRepository;
use lipa_core::repositories::payment_repository::PaymentRepository;
use lipa_primitives::models::entities::enum_types::PaymentStatus;
use lipa_primitives::models::entities::order::{NewOrder, Order};
use lipa_primitives::models::entities::payment::{NewPayment, METHOD_MPESA_STK};
use rust_decimal::Decimal;
use std::env;

/// Checkout id of the seeded pending payment; post a callback with it to try reconciliation locally.
const DEMO_CHECKOUT_REQUEST_ID: &str = "ws_CO_DEMO_0001";

fn establish_connection() -> Result<PgConnection> {
    let database_url = env::var("DATABASE_URL").map_err(|_| eyre!("DATABASE_URL must be set"))?;
    PgConnection::establish(&database_url)
        .map_err(|e| eyre!("Error connecting to database: {}", e))
}

fn main() -> Result<()> {
    dotenv().ok();
    println!("🌱 Seeding database...");

    let mut conn = establish_connection()?;

    // 1. Clean DB
    clean_db(&mut conn)?;

    // 2. Seed orders
    let fees = seed_order(&mut conn, "Jane Wanjiku", "Term 1 school fees", Decimal::new(1500000, 2))?;
    seed_order(&mut conn, "Otieno Ochieng", "Solar lamp", Decimal::new(250000, 2))?;
    seed_order(&mut conn, "Amina Hassan", "Airtime bundle", Decimal::new(10000, 2))?;

    // 3. Seed a pending STK payment awaiting its callback
    let payment = PaymentRepository::create(
        &mut conn,
        NewPayment {
            order_id: fees.id,
            user_id: None,
            amount: fees.amount,
            method: METHOD_MPESA_STK.to_string(),
            status: PaymentStatus::Pending,
            checkout_request_id: Some(DEMO_CHECKOUT_REQUEST_ID.to_string()),
            merchant_request_id: Some("29115-34620561-1".to_string()),
        },
    )
    .map_err(|e| eyre!("Error seeding payment: {}", e))?;

    println!(
        "💳 Pending payment {} for order {} (CheckoutRequestID {})",
        payment.id, fees.id, DEMO_CHECKOUT_REQUEST_ID
    );
    println!("✅ Database seeded successfully!");
    Ok(())
}

fn clean_db(conn: &mut PgConnection) -> Result<()> {
    println!("🧹 Cleaning database...");
    diesel::sql_query("TRUNCATE callback_events, payments, orders RESTART IDENTITY CASCADE")
        .execute(conn)
        .map_err(|e| eyre!("Error truncating tables: {}", e))?;
    Ok(())
}

fn seed_order(
    conn: &mut PgConnection,
    customer_name: &str,
    product: &str,
    amount: Decimal,
) -> Result<Order> {
    let order = OrderRepository::create(
        conn,
        NewOrder {
            customer_name: customer_name.to_string(),
            product: product.to_string(),
            amount,
        },
    )
    .map_err(|e| eyre!("Error seeding order: {}", e))?;

    println!("📦 Order {}: {} for {} ({})", order.id, product, customer_name, amount);
    Ok(order)
}
