/// Session Service
///
/// Orchestrates the password hasher, access token codec and refresh token
/// manager over the credential store. Everything here is stateless: shared
/// mutable state lives in the database, so concurrent requests need no
/// in-process locking.
///
/// Session lifecycle: login verifies credentials and emits one access
/// token plus one new refresh token; refresh exchanges a live refresh
/// token for a fresh access token (the refresh token itself is unchanged);
/// logout revokes a single refresh token, leaving the user's other
/// sessions valid.

use actix_web::http::header::HeaderMap;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::headers::get_bearer_token;
use crate::auth::jwt::{generate_access_token, validate_access_token};
use crate::auth::password::verify_password;
use crate::auth::refresh_token::{
    generate_refresh_token, redeem_refresh_token, revoke_refresh_token, save_refresh_token,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// User fields returned alongside tokens at login.
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The token pair emitted by a successful login.
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Verify credentials and open a session.
///
/// Looks the user up by email and verifies the password attempt against
/// the stored hash. An unknown email and a wrong password fail with the
/// same `InvalidCredentials` error so the response never reveals which
/// part was wrong. On success, issues an access token and persists a new
/// refresh token; any refresh tokens from earlier logins stay valid
/// (one per device).
pub async fn login(
    pool: &PgPool,
    jwt_config: &JwtSettings,
    email: &str,
    password: &str,
) -> Result<(AuthenticatedUser, SessionTokens), AppError> {
    let row = sqlx::query_as::<_, (Uuid, String, String, DateTime<Utc>, DateTime<Utc>)>(
        "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or(AuthError::InvalidCredentials)?;

    let (id, email, password_hash, created_at, updated_at) = row;

    if !verify_password(password, &password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let access_token = generate_access_token(&id, jwt_config)?;
    let refresh_token = generate_refresh_token();
    save_refresh_token(pool, id, &refresh_token, jwt_config.refresh_token_expiry).await?;

    tracing::info!(user_id = %id, "Session opened");

    Ok((
        AuthenticatedUser {
            id,
            email,
            created_at,
            updated_at,
        },
        SessionTokens {
            access_token,
            refresh_token,
        },
    ))
}

/// Exchange a live refresh token for a fresh access token.
///
/// The refresh token is redeemed, not rotated: it remains valid for
/// further refreshes until it expires or is revoked. No credentials are
/// required.
pub async fn refresh(
    pool: &PgPool,
    jwt_config: &JwtSettings,
    refresh_token: &str,
) -> Result<String, AppError> {
    let user_id = redeem_refresh_token(pool, refresh_token).await?;

    tracing::info!(user_id = %user_id, "Access token refreshed");

    generate_access_token(&user_id, jwt_config)
}

/// Close a session by revoking its refresh token. Other outstanding
/// refresh tokens for the same user remain valid.
pub async fn logout(pool: &PgPool, refresh_token: &str) -> Result<(), AppError> {
    revoke_refresh_token(pool, refresh_token).await
}

/// Authorize a request: extract the bearer access token and validate it,
/// returning the authenticated user id.
///
/// Precondition for every protected endpoint. Purely local - signature
/// and expiry check, no store lookup.
pub fn authorize(headers: &HeaderMap, jwt_config: &JwtSettings) -> Result<Uuid, AppError> {
    let token = get_bearer_token(headers)?;
    let claims = validate_access_token(&token, jwt_config)?;
    claims.user_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 5184000,
            issuer: "chirpy-access".to_string(),
        }
    }

    #[test]
    fn test_authorize_round_trip() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();
        let token = generate_access_token(&user_id, &config).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        assert_eq!(authorize(&headers, &config).unwrap(), user_id);
    }

    #[test]
    fn test_authorize_without_header() {
        let config = get_test_config();
        let headers = HeaderMap::new();

        assert!(matches!(
            authorize(&headers, &config),
            Err(AppError::Auth(AuthError::MissingToken))
        ));
    }

    #[test]
    fn test_authorize_rejects_refresh_style_token() {
        // An opaque refresh token is not a JWT and must not authorize.
        let config = get_test_config();
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", generate_refresh_token())).unwrap(),
        );

        assert!(matches!(
            authorize(&headers, &config),
            Err(AppError::Auth(AuthError::MalformedToken))
        ));
    }
}
