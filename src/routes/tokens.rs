/// Token Routes
///
/// Refresh-token redemption and revocation. Both endpoints take the
/// refresh token as the bearer credential, not in the request body.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::{get_bearer_token, session};
use crate::configuration::JwtSettings;
use crate::error::{AppError, ErrorContext};

/// Refresh response: a fresh access token. The refresh token is not
/// rotated and is not echoed back.
#[derive(Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// POST /api/refresh
///
/// Exchange a live refresh token (bearer) for a new access token.
///
/// # Errors
/// - 401: refresh token missing, malformed, unknown, revoked, or expired
pub async fn refresh(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("refresh_token");

    let refresh_token = get_bearer_token(req.headers())?;
    let access_token = session::refresh(pool.get_ref(), jwt_config.get_ref(), &refresh_token).await?;

    tracing::debug!(request_id = %context.request_id, "Access token issued from refresh token");

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_config.access_token_expiry,
    }))
}

/// POST /api/revoke
///
/// Revoke the presented refresh token (bearer). Revoking an
/// already-revoked token succeeds; other refresh tokens for the same user
/// are untouched.
///
/// # Errors
/// - 401: token missing, malformed, or not found in the store
pub async fn revoke(
    req: HttpRequest,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("revoke_token");

    let refresh_token = get_bearer_token(req.headers())?;
    session::logout(pool.get_ref(), &refresh_token).await?;

    tracing::info!(request_id = %context.request_id, "Refresh token revoked");

    Ok(HttpResponse::NoContent().finish())
}
