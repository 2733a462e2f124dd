//! OpenAPI document for the cat catalog API.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::cats::{self, ErrorResponse};

/// Route serving the document, relative to the base path.
pub const OPENAPI_PATH: &str = "/swagger/v1/swagger.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "catapi",
        version = env!("CARGO_PKG_VERSION"),
        description = "Cat catalog with love/hate voting"
    ),
    paths(
        cats::list_cats,
        cats::get_cat,
        cats::add_cat,
        cats::love_cat,
        cats::hate_cat,
        cats::download_image,
    ),
    components(schemas(catapi_core::Cat, catapi_core::NewCat, ErrorResponse)),
    tags((name = "cats", description = "Cat catalog operations")),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
        );
    }
}

pub fn openapi_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ApiDoc::openapi())
}

/// Serve the generated document.
pub async fn get_openapi_json() -> Response {
    match openapi_json() {
        Ok(doc) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            doc,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize OpenAPI document: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
