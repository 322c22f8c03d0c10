/// Authorization header parsing shared by the protected handlers and the
/// token endpoints. Both access and refresh tokens arrive as
/// `Authorization: Bearer <token>`.

use actix_web::http::header::HeaderMap;

use crate::error::{AppError, AuthError};

/// Extract the bearer token from the Authorization header.
///
/// # Errors
/// - `MissingToken` when the header is absent
/// - `MalformedToken` when the header is not `Bearer <token>`
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let mut parts = auth_header.splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some("Bearer"), Some(token)) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::MalformedToken.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn test_extracts_bearer_token() {
        let headers = headers_with_auth("Bearer some-token-value");
        assert_eq!(get_bearer_token(&headers).unwrap(), "some-token-value");
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        let result = get_bearer_token(&headers);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::MissingToken))
        ));
    }

    #[test]
    fn test_malformed_headers() {
        for value in ["Bearer", "Basic dXNlcjpwYXNz", "BearerToken", "Bearer "] {
            let headers = headers_with_auth(value);
            let result = get_bearer_token(&headers);
            assert!(
                matches!(result, Err(AppError::Auth(AuthError::MalformedToken))),
                "should reject: {:?}",
                value
            );
        }
    }
}
