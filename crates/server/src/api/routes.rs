use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use super::middleware::{auth_middleware, metrics_middleware};
use super::openapi::{get_openapi_json, OPENAPI_PATH};
use super::{cats, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let auth_layer = middleware::from_fn_with_state(Arc::clone(&state), auth_middleware);

    // Anonymous API routes
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/cats", get(cats::list_cats))
        .route("/cat/{id}", get(cats::get_cat));

    // Mutations and image downloads require credentials
    let protected_routes = Router::new()
        .route("/cat", post(cats::add_cat))
        .route("/cat/", post(cats::add_cat))
        .route("/love/{id}", put(cats::love_cat))
        .route("/hate/{id}", put(cats::hate_cat))
        .route("/image/{id}", get(cats::download_image))
        .route_layer(auth_layer);

    let mut app = Router::new()
        .route("/metrics", get(handlers::metrics))
        .route(OPENAPI_PATH, get(get_openapi_json))
        .nest("/api", public_routes.merge(protected_routes));

    if let Some(static_dir) = &state.config().server.static_dir {
        info!("Serving static files from {:?}", static_dir);
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    let base_path = state.config().server.base_path.trim_end_matches('/').to_string();
    let app = if base_path.is_empty() {
        app
    } else {
        info!("Mounting routes under {}", base_path);
        Router::new().nest(&base_path, app)
    };

    app.layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
}
