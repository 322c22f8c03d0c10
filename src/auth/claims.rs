/// JWT Claims structure
///
/// Payload of an access token: the subject (user id) plus the standard
/// timestamp and issuer claims (RFC 7519). Access tokens are stateless -
/// everything needed to validate one is in here and the signature.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer tag
    pub iss: String,
}

impl Claims {
    /// Create new claims for a user, expiring `expiry_seconds` from now.
    pub fn new(user_id: Uuid, expiry_seconds: i64, issuer: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
        }
    }

    /// Extract the user ID from the subject claim.
    ///
    /// # Errors
    /// Returns `MalformedToken` if the subject is not a valid UUID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::MalformedToken.into())
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, 3600, "chirpy-access".to_string());

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, "chirpy-access");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, 3600, "chirpy-access".to_string());

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_invalid_user_id() {
        let mut claims = Claims::new(Uuid::new_v4(), 3600, "chirpy-access".to_string());
        claims.sub = "not-a-uuid".to_string();

        assert!(claims.user_id().is_err());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let claims = Claims::new(Uuid::new_v4(), -10, "chirpy-access".to_string());
        assert!(claims.is_expired());
    }
}
