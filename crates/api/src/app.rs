use crate::config::swagger_config::ApiDoc;
use crate::handlers::{
    callback_events::list_callback_events,
    health::health_check,
    mpesa_callback::mpesa_callback,
    orders::{create_order, get_order, list_orders},
    payments::{create_payment, get_payment, list_payments, update_payment_status},
    stk_push::stk_push,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use axum_prometheus::{metrics_exporter_prometheus::PrometheusHandle, PrometheusMetricLayer};
use lipa_core::AppState;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

pub fn create_router(
    state: Arc<AppState>,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(order_routes())
        .merge(payment_routes())
        .route("/api/health", get(health_check))
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(axum::extract::DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(metric_layer)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

fn order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/{id}", get(get_order))
}

fn payment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/payments", get(list_payments).post(create_payment))
        .route("/api/payments/stk", post(stk_push))
        .route("/api/payments/callback", post(mpesa_callback))
        .route("/api/payments/{id}", get(get_payment))
        .route("/api/payments/{id}/status", put(update_payment_status))
        .route("/api/callbacks", get(list_callback_events))
}
