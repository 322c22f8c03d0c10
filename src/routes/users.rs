/// User Routes
///
/// Registration, profile updates, and login.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, session};
use crate::configuration::JwtSettings;
use crate::error::{AppError, ErrorContext};
use crate::validators::{is_valid_email, is_valid_password};

/// Registration / profile update request
#[derive(Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User fields as returned by the API. Password hashes never leave the
/// server.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Login response: user fields plus both session tokens
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// POST /api/users
///
/// Register a new user with email and password.
///
/// # Errors
/// - 400: invalid email format or unacceptable password
/// - 409: email already registered
/// - 500: internal server error
pub async fn create_user(
    form: web::Json<UserRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_user");

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let password_hash = hash_password(&form.password)?;

    let user_id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(&email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "User registered"
    );

    Ok(HttpResponse::Created().json(UserResponse {
        id: user_id.to_string(),
        email,
        created_at: now.to_rfc3339(),
        updated_at: now.to_rfc3339(),
    }))
}

/// PUT /api/users
///
/// Update the authenticated user's email and password.
/// Requires a valid access token in the Authorization header.
///
/// # Errors
/// - 400: invalid email format or unacceptable password
/// - 401: missing/invalid access token
/// - 409: email already taken by another user
pub async fn update_user(
    req: HttpRequest,
    form: web::Json<UserRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("update_user");

    let user_id = session::authorize(req.headers(), jwt_config.get_ref())?;

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let password_hash = hash_password(&form.password)?;

    let now = Utc::now();
    let created_at = sqlx::query_scalar::<_, chrono::DateTime<Utc>>(
        r#"
        UPDATE users
        SET email = $1, password_hash = $2, updated_at = $3
        WHERE id = $4
        RETURNING created_at
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .bind(now)
    .bind(user_id)
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "User updated"
    );

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user_id.to_string(),
        email,
        created_at: created_at.to_rfc3339(),
        updated_at: now.to_rfc3339(),
    }))
}

/// POST /api/login
///
/// Authenticate with email and password; returns the user fields plus an
/// access token and a new refresh token.
///
/// # Security Notes
/// - Unknown email and wrong password produce the same 401 response, so
///   the endpoint cannot be used to enumerate accounts.
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("login");

    let (user, tokens) = session::login(
        pool.get_ref(),
        jwt_config.get_ref(),
        form.email.trim(),
        &form.password,
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        id: user.id.to_string(),
        email: user.email,
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_config.access_token_expiry,
    }))
}
