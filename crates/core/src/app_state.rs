use crate::clients::{MpesaClient, PaymentGateway};
use crate::stores::{Datastore, PgStore};
use diesel::r2d2::{self, ConnectionManager};
use diesel::PgConnection;
use eyre::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub use lipa_primitives::models::app_config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn Datastore>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig) -> Result<Arc<Self>> {
        Self::with_store(config, Arc::new(PgStore::new(db)))
    }

    /// Same wiring as [`AppState::new`] over any store adapter.
    pub fn with_store(config: AppConfig, store: Arc<dyn Datastore>) -> Result<Arc<Self>> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.mpesa_details.timeout_secs))
            .build()?;

        let mpesa = MpesaClient::new(http, &config.mpesa_details)?;

        Ok(Arc::new(Self {
            config,
            store,
            gateway: Arc::new(mpesa),
        }))
    }
}
