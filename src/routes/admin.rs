/// Admin Routes
///
/// Fileserver hit metrics and the dev-only full reset.

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::configuration::ApplicationSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::middleware::FileserverMetrics;

/// GET /admin/metrics
///
/// HTML page showing how many times the app fileserver has been hit since
/// startup (or the last reset).
pub async fn metrics(metrics: web::Data<FileserverMetrics>) -> HttpResponse {
    let body = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        metrics.hits()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// Delete all users (chirps and refresh tokens cascade) and zero the hit
/// counter. Only available when the platform is "dev".
///
/// # Errors
/// - 403: not a dev deployment
pub async fn reset(
    app_settings: web::Data<ApplicationSettings>,
    pool: web::Data<PgPool>,
    metrics: web::Data<FileserverMetrics>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("admin_reset");

    if !app_settings.is_dev() {
        return Err(AuthError::Forbidden.into());
    }

    sqlx::query("DELETE FROM users").execute(pool.get_ref()).await?;
    metrics.reset();

    tracing::warn!(request_id = %context.request_id, "All users deleted and metrics reset");

    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "reset successful"})))
}
