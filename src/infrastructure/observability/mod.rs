//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_evaluation, record_http_request,
    record_rate_limited, record_training_run, PrometheusMetrics,
};
