/// Chirp Routes
///
/// Create, list, fetch and delete chirps. Reads are public; writes require
/// a valid access token. Bodies are capped at 140 bytes and run through
/// the profanity filter before storage.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::session;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext, ValidationError};
use crate::validators::is_valid_chirp_body;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Chirp creation request
#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

/// Query parameters for listing chirps
#[derive(Deserialize)]
pub struct ChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

/// Chirp as returned by the API
#[derive(Serialize)]
pub struct ChirpResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub body: String,
    pub user_id: String,
}

type ChirpRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, Uuid);

impl From<ChirpRow> for ChirpResponse {
    fn from(row: ChirpRow) -> Self {
        let (id, created_at, updated_at, body, user_id) = row;
        Self {
            id: id.to_string(),
            created_at: created_at.to_rfc3339(),
            updated_at: updated_at.to_rfc3339(),
            body,
            user_id: user_id.to_string(),
        }
    }
}

/// Replace profane words with ****. Matching is case-insensitive and
/// whole-word; surrounding whitespace is collapsed to single spaces.
fn clean_profanity(body: &str) -> String {
    body.split_whitespace()
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// POST /api/chirps
///
/// Create a chirp as the authenticated user.
///
/// # Errors
/// - 400: empty body or body over 140 bytes
/// - 401: missing/invalid access token
pub async fn create_chirp(
    req: HttpRequest,
    form: web::Json<ChirpRequest>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_chirp");

    let user_id = session::authorize(req.headers(), jwt_config.get_ref())?;

    is_valid_chirp_body(&form.body)?;
    let body = clean_profanity(&form.body);

    let chirp_id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO chirps (id, user_id, body, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(chirp_id)
    .bind(user_id)
    .bind(&body)
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        chirp_id = %chirp_id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(ChirpResponse {
        id: chirp_id.to_string(),
        created_at: now.to_rfc3339(),
        updated_at: now.to_rfc3339(),
        body,
        user_id: user_id.to_string(),
    }))
}

/// GET /api/chirps
///
/// List chirps, `created_at` ascending by default. Query params:
/// `author_id` filters to one author, `sort=desc` reverses the order.
///
/// # Errors
/// - 400: author_id is not a valid UUID
pub async fn get_chirps(
    query: web::Query<ChirpsQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let author_id = match &query.author_id {
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| ValidationError::InvalidFormat("author_id".to_string()))?,
        ),
        None => None,
    };

    let descending = query.sort.as_deref() == Some("desc");

    let rows = match (author_id, descending) {
        (Some(author), false) => {
            sqlx::query_as::<_, ChirpRow>(
                "SELECT id, created_at, updated_at, body, user_id FROM chirps \
                 WHERE user_id = $1 ORDER BY created_at ASC",
            )
            .bind(author)
            .fetch_all(pool.get_ref())
            .await?
        }
        (Some(author), true) => {
            sqlx::query_as::<_, ChirpRow>(
                "SELECT id, created_at, updated_at, body, user_id FROM chirps \
                 WHERE user_id = $1 ORDER BY created_at DESC",
            )
            .bind(author)
            .fetch_all(pool.get_ref())
            .await?
        }
        (None, false) => {
            sqlx::query_as::<_, ChirpRow>(
                "SELECT id, created_at, updated_at, body, user_id FROM chirps \
                 ORDER BY created_at ASC",
            )
            .fetch_all(pool.get_ref())
            .await?
        }
        (None, true) => {
            sqlx::query_as::<_, ChirpRow>(
                "SELECT id, created_at, updated_at, body, user_id FROM chirps \
                 ORDER BY created_at DESC",
            )
            .fetch_all(pool.get_ref())
            .await?
        }
    };

    let chirps: Vec<ChirpResponse> = rows.into_iter().map(ChirpResponse::from).collect();

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
///
/// Fetch a single chirp.
///
/// # Errors
/// - 400: chirp_id is not a valid UUID
/// - 404: no such chirp
pub async fn get_chirp(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| ValidationError::InvalidFormat("chirp_id".to_string()))?;

    let row = sqlx::query_as::<_, ChirpRow>(
        "SELECT id, created_at, updated_at, body, user_id FROM chirps WHERE id = $1",
    )
    .bind(chirp_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| DatabaseError::NotFound("chirp".to_string()))?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from(row)))
}

/// DELETE /api/chirps/{chirp_id}
///
/// Delete a chirp. Only its author may delete it.
///
/// # Errors
/// - 400: chirp_id is not a valid UUID
/// - 401: missing/invalid access token
/// - 403: authenticated user is not the author
/// - 404: no such chirp
pub async fn delete_chirp(
    req: HttpRequest,
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("delete_chirp");

    let user_id = session::authorize(req.headers(), jwt_config.get_ref())?;

    let chirp_id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| ValidationError::InvalidFormat("chirp_id".to_string()))?;

    let author_id = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM chirps WHERE id = $1")
        .bind(chirp_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| DatabaseError::NotFound("chirp".to_string()))?;

    if author_id != user_id {
        return Err(AuthError::Forbidden.into());
    }

    sqlx::query("DELETE FROM chirps WHERE id = $1 AND user_id = $2")
        .bind(chirp_id)
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        chirp_id = %chirp_id,
        "Chirp deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_profanity_masks_words() {
        assert_eq!(
            clean_profanity("This is a kerfuffle opinion I need to share"),
            "This is a **** opinion I need to share"
        );
    }

    #[test]
    fn test_clean_profanity_is_case_insensitive() {
        assert_eq!(clean_profanity("Sharbert!? No, SHARBERT"), "Sharbert!? No, ****");
    }

    #[test]
    fn test_clean_profanity_ignores_punctuated_words() {
        // Only whole words are masked; "fornax!" stays as-is.
        assert_eq!(clean_profanity("fornax fornax!"), "**** fornax!");
    }

    #[test]
    fn test_clean_profanity_leaves_clean_text() {
        assert_eq!(
            clean_profanity("I had something interesting for breakfast"),
            "I had something interesting for breakfast"
        );
    }
}
