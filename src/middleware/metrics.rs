/// Fileserver Metrics Middleware
///
/// Counts requests served through the app fileserver scope. The counter is
/// request-scoped state handed to the middleware at construction, not a
/// process-wide global; the admin surface reads and resets it through the
/// same shared handle.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Shared hit counter for the static app fileserver.
#[derive(Default)]
pub struct FileserverMetrics {
    hits: AtomicI64,
}

impl FileserverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> i64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

/// Middleware recording a hit for every request passing through the
/// scope it wraps.
pub struct MetricsMiddleware {
    metrics: actix_web::web::Data<FileserverMetrics>,
}

impl MetricsMiddleware {
    pub fn new(metrics: actix_web::web::Data<FileserverMetrics>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
    metrics: actix_web::web::Data<FileserverMetrics>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        self.metrics.record_hit();

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_zero() {
        let metrics = FileserverMetrics::new();
        assert_eq!(metrics.hits(), 0);
    }

    #[test]
    fn test_record_and_reset() {
        let metrics = FileserverMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        assert_eq!(metrics.hits(), 3);

        metrics.reset();
        assert_eq!(metrics.hits(), 0);
    }
}
