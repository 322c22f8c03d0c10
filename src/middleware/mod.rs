mod metrics;

pub use metrics::{FileserverMetrics, MetricsMiddleware};
