//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_file, download_file, get_file, login, me, register, search_files, suggest,
    upload_file, AppState,
};
use super::middleware::{create_cors_layer, identity_auth};

/// Room left in the request body limit for multipart framing and text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me));

    let body_limit = usize::try_from(app_state.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let file_routes = Router::new()
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/:id", get(get_file).delete(delete_file))
        .route("/:id/download", get(download_file));

    let search_routes = Router::new()
        .route("/", get(search_files))
        .route("/suggest", get(suggest));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/files", file_routes)
        .nest("/search", search_routes);

    let codec = app_state.auth.codec().clone();

    Router::new()
        .nest("/api", api_routes)
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let codec = codec.clone();
                    identity_auth(codec, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
