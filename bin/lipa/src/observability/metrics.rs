use axum_prometheus::metrics_exporter_prometheus::PrometheusHandle;
use axum_prometheus::{PrometheusMetricLayer, PrometheusMetricLayerBuilder};

const METRIC_PREFIX: &str = "lipa";

pub fn setup_metrics() -> (PrometheusMetricLayer<'static>, PrometheusHandle) {
    PrometheusMetricLayerBuilder::new()
        .with_prefix(METRIC_PREFIX)
        .with_ignore_patterns(&["/metrics", "/swagger-ui", "/api-docs/openapi.json"])
        .with_default_metrics()
        .build_pair()
}
