/// Access Token Codec
///
/// Creation and validation of signed, stateless access tokens. Validation
/// is a pure function of the signature and expiry - no store lookup - so
/// an access token cannot be invalidated before its natural expiry; only
/// refresh tokens provide a revocation point.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Generate a new access token for a user, expiring after the configured
/// access token TTL.
///
/// # Errors
/// Returns `Internal` if signing fails.
pub fn generate_access_token(user_id: &Uuid, config: &JwtSettings) -> Result<String, AppError> {
    let claims = Claims::new(*user_id, config.access_token_expiry, config.issuer.clone());

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate an access token and extract its claims.
///
/// Failures are tagged so expiry can be told apart from tampering:
/// - `TokenExpired` when the token is past its expiry (zero leeway),
/// - `BadSignature` when signature verification fails,
/// - `MalformedToken` when the token cannot be parsed or the issuer tag
///   does not match.
pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    // Expiry is exact; the default leeway would let a just-expired token
    // validate for another minute.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let kind = match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::BadSignature,
            _ => AuthError::MalformedToken,
        };
        tracing::warn!(error = %e, "Access token validation failed");
        kind.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 5184000,
            issuer: "chirpy-access".to_string(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&user_id, &config).expect("Failed to generate token");
        let claims = validate_access_token(&token, &config).expect("Failed to validate token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, "chirpy-access");
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let config = get_test_config();
        let result = validate_access_token("invalid.token.here", &config);

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::MalformedToken))
        ));
    }

    #[test]
    fn test_tampered_token_fails() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&user_id, &config).expect("Failed to generate token");

        let tampered = format!("{}X", token);
        assert!(validate_access_token(&tampered, &config).is_err());
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&user_id, &config).expect("Failed to generate token");

        let mut other = get_test_config();
        other.secret = "a-completely-different-signing-secret-here".to_string();
        let result = validate_access_token(&token, &other);

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::BadSignature))
        ));
    }

    #[test]
    fn test_wrong_issuer_is_malformed() {
        let mut config = get_test_config();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&user_id, &config).expect("Failed to generate token");

        config.issuer = "some-other-service".to_string();
        let result = validate_access_token(&token, &config);

        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::MalformedToken))
        ));
    }

    #[test]
    fn test_short_ttl_token_expires() {
        let mut config = get_test_config();
        config.access_token_expiry = 1;
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&user_id, &config).expect("Failed to generate token");
        std::thread::sleep(std::time::Duration::from_secs(2));

        let result = validate_access_token(&token, &config);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::TokenExpired))
        ));
    }
}
