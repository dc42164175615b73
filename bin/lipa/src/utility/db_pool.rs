use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use eyre::{eyre, Report};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::time::Duration;
use tracing::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../../migrations");

const MAX_POOL_SIZE: u32 = 20;

pub fn create_db_pool() -> Result<Pool<ConnectionManager<PgConnection>>, Report> {
    let db_url = SecretString::from(
        env::var("DATABASE_URL").map_err(|_| eyre!("DATABASE_URL must be set"))?,
    );

    let manager = ConnectionManager::<PgConnection>::new(db_url.expose_secret());

    let pool = Pool::builder()
        .max_size(MAX_POOL_SIZE)
        .min_idle(Some(2))
        .connection_timeout(Duration::from_secs(8))
        .idle_timeout(Some(Duration::from_secs(300)))
        .max_lifetime(Some(Duration::from_secs(1800)))
        .test_on_check_out(true)
        .build(manager)?;

    info!(max_size = MAX_POOL_SIZE, "PostgreSQL connection pool created");

    Ok(pool)
}

pub fn run_migrations(pool: &Pool<ConnectionManager<PgConnection>>) -> Result<(), Report> {
    let mut pooled = pool.get()?;
    let conn: &mut PgConnection = &mut pooled;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to run migrations: {}", e))?;

    for version in &applied {
        info!(%version, "Applied migration");
    }
    if applied.is_empty() {
        info!("Database schema is up to date");
    }

    Ok(())
}
