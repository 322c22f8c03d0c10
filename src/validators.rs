/// Input validators - request field validation shared by the route handlers.
///
/// Validation failures surface as 400-level AppError values; nothing here
/// touches the database.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, ValidationError};

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_CHIRP_LENGTH: usize = 140;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates an email address: format plus length constraints.
/// Returns the trimmed email as stored.
pub fn is_valid_email(email: &str) -> Result<String, AppError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()).into());
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH).into());
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH).into());
    }

    if trimmed.matches('@').count() != 1 || !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()).into());
    }

    Ok(trimmed.to_string())
}

/// Password acceptance policy: non-empty and at most 128 bytes.
///
/// No composition rules. Established clients authenticate with short
/// passwords; the memory-hard hash is the protection layer, and the length
/// cap bounds hashing cost per request.
pub fn is_valid_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()).into());
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong("password".to_string(), MAX_PASSWORD_LENGTH).into());
    }

    Ok(())
}

/// Validates a chirp body: non-empty, at most 140 bytes.
pub fn is_valid_chirp_body(body: &str) -> Result<(), AppError> {
    if body.is_empty() {
        return Err(ValidationError::EmptyField("chirp body".to_string()).into());
    }

    if body.len() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp body".to_string(), MAX_CHIRP_LENGTH).into());
    }

    Ok(())
}
