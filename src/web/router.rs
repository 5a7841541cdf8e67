//! Router configuration for the web layer.

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    group_posts, index, post_create, post_create_form, post_detail, post_edit, post_edit_form,
    profile, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the page router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    // Oversized images get a form error; only bodies past this cap are refused.
    let body_limit = usize::try_from(app_state.max_request_size).unwrap_or(usize::MAX);

    let page_routes = Router::new()
        .route("/", get(index))
        .route("/group/:slug/", get(group_posts))
        .route("/profile/:username/", get(profile))
        .route("/posts/:post_id/", get(post_detail))
        .route("/create/", get(post_create_form).post(post_create))
        .route("/posts/:post_id/edit/", get(post_edit_form).post(post_edit));

    // Clone jwt_state for the middleware closure
    let jwt_state_for_middleware = jwt_state.clone();

    page_routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving uploaded media under `url`.
///
/// Returns `None` when `url` is the site root.
pub fn create_media_router(root: &Path, url: &str) -> Option<Router> {
    let prefix = url.trim_end_matches('/');
    if prefix.is_empty() {
        tracing::warn!("Media URL must not be the site root; uploads will not be served");
        return None;
    }

    Some(Router::new().nest_service(prefix, ServeDir::new(root)))
}
