//! Cat catalog API handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catapi_core::{Cat, CatError, NewCat};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use super::middleware::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing cats
#[derive(Debug, Deserialize)]
pub struct ListCatsParams {
    /// Shuffle instead of ranking; accepts `true`/`false` in any case
    pub rand: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error mapped onto a status code and `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("Cat not found: {}", id))
    }
}

impl From<CatError> for ApiError {
    fn from(e: CatError) -> Self {
        match e {
            CatError::Invalid(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            other => {
                error!("Catalog operation failed: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

/// Unreadable or incomplete request bodies are client errors, reported in the
/// same shape as validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

fn parse_flag(value: Option<&str>) -> Result<bool, ApiError> {
    match value {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid value for rand: {}", v),
        )),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List all cats, ranked by votes or shuffled with `?rand=true`
#[utoipa::path(
    get,
    path = "/api/cats",
    tag = "cats",
    params(
        ("rand" = Option<String>, Query, description = "Shuffle instead of ranking (true/false)")
    ),
    responses(
        (status = 200, description = "All cats", body = Vec<Cat>),
        (status = 400, description = "Invalid rand value", body = ErrorResponse),
    )
)]
pub async fn list_cats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListCatsParams>,
) -> Result<Json<Vec<Cat>>, ApiError> {
    let randomize = parse_flag(params.rand.as_deref())?;
    Ok(Json(state.cats().list_cats(randomize).await?))
}

/// Get a cat by ID
#[utoipa::path(
    get,
    path = "/api/cat/{id}",
    tag = "cats",
    params(("id" = String, Path, description = "Cat id")),
    responses(
        (status = 200, description = "The cat", body = Cat),
        (status = 404, description = "Unknown id", body = ErrorResponse),
    )
)]
pub async fn get_cat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Cat>, ApiError> {
    match state.cats().get_cat(&id).await? {
        Some(cat) => Ok(Json(cat)),
        None => Err(ApiError::not_found(&id)),
    }
}

/// Add a new cat
#[utoipa::path(
    post,
    path = "/api/cat",
    tag = "cats",
    request_body = NewCat,
    responses(
        (status = 200, description = "The stored cat", body = Cat),
        (status = 400, description = "Missing or blank url/name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(("basic" = []))
)]
pub async fn add_cat(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<NewCat>, JsonRejection>,
) -> Result<Json<Cat>, ApiError> {
    let Json(body) = payload?;
    let cat = state.cats().add_cat(body).await?;
    info!(cat_id = %cat.id, user = %user_id, "Cat created via API");
    Ok(Json(cat))
}

/// Add a love vote
#[utoipa::path(
    put,
    path = "/api/love/{id}",
    tag = "cats",
    params(("id" = String, Path, description = "Cat id")),
    responses(
        (status = 200, description = "The updated cat", body = Cat),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse),
    ),
    security(("basic" = []))
)]
pub async fn love_cat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Cat>, ApiError> {
    match state.cats().add_love(&id).await? {
        Some(cat) => Ok(Json(cat)),
        None => Err(ApiError::not_found(&id)),
    }
}

/// Add a hate vote
#[utoipa::path(
    put,
    path = "/api/hate/{id}",
    tag = "cats",
    params(("id" = String, Path, description = "Cat id")),
    responses(
        (status = 200, description = "The updated cat", body = Cat),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse),
    ),
    security(("basic" = []))
)]
pub async fn hate_cat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Cat>, ApiError> {
    match state.cats().add_hate(&id).await? {
        Some(cat) => Ok(Json(cat)),
        None => Err(ApiError::not_found(&id)),
    }
}

/// Download the cat's image into the configured directory
#[utoipa::path(
    get,
    path = "/api/image/{id}",
    tag = "cats",
    params(("id" = String, Path, description = "Cat id")),
    responses(
        (status = 200, description = "Image saved to the download directory"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown id or download failed", body = ErrorResponse),
    ),
    security(("basic" = []))
)]
pub async fn download_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.cats().download_image(&id).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Image not available for cat: {}", id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag(None).unwrap());
        assert!(!parse_flag(Some("")).unwrap());
        assert!(parse_flag(Some("true")).unwrap());
        assert!(parse_flag(Some("True")).unwrap());
        assert!(!parse_flag(Some("FALSE")).unwrap());
        assert!(parse_flag(Some("yes")).is_err());
    }

    #[test]
    fn test_cat_error_status_mapping() {
        let cases = [
            (CatError::Invalid("blank".into()), StatusCode::BAD_REQUEST),
            (
                CatError::Storage("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CatError::DuplicateKey("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }
}
