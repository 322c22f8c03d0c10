/// Refresh Token Manager
///
/// Generation, persistence, redemption and revocation of the long-lived
/// opaque tokens used to mint new access tokens without re-authentication.
/// Refresh tokens are:
/// - Cryptographically random 64-character strings (no store-side
///   uniqueness check needed at that entropy; the primary key constraint
///   is defense in depth)
/// - Hashed with SHA-256 before storage (never store plaintext)
/// - Database-backed so they can be revoked before their natural expiry
///
/// Redeeming a token does NOT rotate it: a refresh token stays redeemable
/// until it expires or is explicitly revoked, so multiple devices and
/// retried requests keep working. Rotation-on-use would harden against
/// token theft at the cost of breaking that behavior.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// Generate a new refresh token: 64 alphanumeric characters from a CSPRNG,
/// well over 32 bytes of entropy. The plaintext is returned to the client
/// and never stored.
pub fn generate_refresh_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Hash a refresh token for storage lookup.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Persist a new refresh token for a user, expiring `expiry_seconds` from
/// now and not revoked.
///
/// # Errors
/// Returns a database error if the insert fails.
pub async fn save_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    token: &str,
    expiry_seconds: i64,
) -> Result<(), AppError> {
    let token_hash = hash_token(token);
    let expires_at = Utc::now() + Duration::seconds(expiry_seconds);

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (token_hash, user_id, created_at, expires_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(token_hash)
    .bind(user_id)
    .bind(Utc::now())
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Redeem a refresh token: return the owning user id if a matching,
/// unrevoked, unexpired record exists.
///
/// This is a read-only single-row lookup - concurrent redemptions of the
/// same still-valid token all succeed, and the token stays live afterward.
///
/// # Errors
/// Returns `RefreshTokenNotFound` when the token is absent, revoked, or
/// expired; the caller cannot tell which.
pub async fn redeem_refresh_token(pool: &PgPool, token: &str) -> Result<Uuid, AppError> {
    let token_hash = hash_token(token);

    let result = sqlx::query_as::<_, (Uuid, DateTime<Utc>, Option<DateTime<Utc>>)>(
        r#"
        SELECT user_id, expires_at, revoked_at
        FROM refresh_tokens
        WHERE token_hash = $1
        "#,
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    match result {
        None => {
            tracing::warn!("Refresh token not found in database");
            Err(AuthError::RefreshTokenNotFound.into())
        }
        Some((user_id, expires_at, revoked_at)) => {
            if revoked_at.is_some() {
                tracing::warn!(user_id = %user_id, "Attempt to redeem revoked refresh token");
                return Err(AuthError::RefreshTokenNotFound.into());
            }

            if expires_at < Utc::now() {
                tracing::info!(user_id = %user_id, "Refresh token expired");
                return Err(AuthError::RefreshTokenNotFound.into());
            }

            Ok(user_id)
        }
    }
}

/// Revoke a refresh token. Idempotent: revoking an already-revoked token
/// succeeds and keeps the original revocation timestamp.
///
/// # Errors
/// Returns `RefreshTokenNotFound` when no record exists for the token.
pub async fn revoke_refresh_token(pool: &PgPool, token: &str) -> Result<(), AppError> {
    let token_hash = hash_token(token);

    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked_at = COALESCE(revoked_at, $1)
        WHERE token_hash = $2
        "#,
    )
    .bind(Utc::now())
    .bind(token_hash)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AuthError::RefreshTokenNotFound.into());
    }

    Ok(())
}

/// Revoke all live refresh tokens for a user (logout-all-devices).
pub async fn revoke_all_user_tokens(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked_at = $1
        WHERE user_id = $2 AND revoked_at IS NULL
        "#,
    )
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    tracing::info!(user_id = %user_id, "All refresh tokens revoked for user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let token1 = generate_refresh_token();
        let token2 = generate_refresh_token();

        assert_ne!(token1, token2);
    }

    #[test]
    fn test_token_hashing() {
        let token = generate_refresh_token();
        let hash1 = hash_token(&token);
        let hash2 = hash_token(&token);

        // Same token should produce same hash
        assert_eq!(hash1, hash2);
        // Hash should not equal plaintext
        assert_ne!(token, hash1);
        // Hash should be 64 chars (SHA-256 hex)
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_tokens_different_hashes() {
        let hash1 = hash_token(&generate_refresh_token());
        let hash2 = hash_token(&generate_refresh_token());

        assert_ne!(hash1, hash2);
    }
}
