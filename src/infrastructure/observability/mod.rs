//! Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_http_request, record_llm_request,
    record_task_finished, LlmRequestMetricParams, PrometheusMetrics,
};
