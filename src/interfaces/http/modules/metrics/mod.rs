//! Prometheus metrics module

pub mod handlers;
pub mod middleware;

pub use handlers::MetricsState;
pub use middleware::http_metrics_middleware;
