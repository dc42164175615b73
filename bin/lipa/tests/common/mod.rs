#![allow(dead_code)]

use axum::Router;
use axum_prometheus::metrics_exporter_prometheus::PrometheusHandle;
use axum_prometheus::PrometheusMetricLayer;
use axum_test::TestServer;
use lipa_core::stores::Datastore;
use lipa_core::{AppState, InMemoryStore};
use lipa_primitives::models::app_state::app_config::AppConfig;
use lipa_primitives::models::app_state::mpesa_details::MpesaInfo;
use secrecy::SecretString;
use std::sync::{Arc, Once, OnceLock};
use wiremock::MockServer;

pub mod fixtures;

pub const TEST_SHORTCODE: &str = "174379";
pub const TEST_PASSKEY: &str = "bfb279f9aa9bdbcf158e97dd71a467cd2e0c893059b10f78e6b72ada1ed2c919";

static INIT: Once = Once::new();
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn init_once() {
    INIT.call_once(|| {
        std::env::set_var("APP_ENV", "test");
        if std::env::var("TEST_LOG").is_ok() {
            lipa::utility::logging::setup_logging();
        }
    });
}

pub fn test_config(mpesa_api_url: &str) -> AppConfig {
    AppConfig {
        app_url: "http://localhost:8080".to_string(),
        app_env: "test".to_string(),
        mpesa_details: MpesaInfo {
            mpesa_api_url: mpesa_api_url.to_string(),
            consumer_key: "test_consumer_key".to_string(),
            consumer_secret: SecretString::from("test_consumer_secret"),
            shortcode: TEST_SHORTCODE.to_string(),
            passkey: SecretString::from(TEST_PASSKEY),
            callback_url: "https://example.com/api/payments/callback".to_string(),
            transaction_desc: "Order Payment".to_string(),
            account_reference: "ORDER".to_string(),
            timeout_secs: 5,
        },
    }
}

/// App state over an in-memory store, talking to a mock Daraja at `mpesa_api_url`.
pub fn create_test_app_state(mpesa_api_url: &str, store: Arc<dyn Datastore>) -> Arc<AppState> {
    init_once();
    AppState::with_store(test_config(mpesa_api_url), store).expect("Failed to build test state")
}

/// The metrics recorder is process-global, so every test router shares one handle.
pub fn create_test_app(state: Arc<AppState>) -> Router {
    let handle = METRICS_HANDLE
        .get_or_init(|| lipa::observability::metrics::setup_metrics().1)
        .clone();
    lipa_api::app::create_router(state, PrometheusMetricLayer::new(), handle)
}

pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryStore,
    pub state: Arc<AppState>,
    pub mpesa: MockServer,
}

pub async fn spawn_app() -> TestApp {
    let mpesa = MockServer::start().await;
    let store = InMemoryStore::new();
    let state = create_test_app_state(&mpesa.uri(), Arc::new(store.clone()));
    let server = TestServer::new(create_test_app(state.clone())).expect("Failed to start test server");

    TestApp {
        server,
        store,
        state,
        mpesa,
    }
}
