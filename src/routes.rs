use crate::handlers::{self, AppState};
use crate::webhook_handler;
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Form submissions are small. The limit is enforced by the JSON extractors,
/// so an oversized body is answered with a 413 error envelope.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The `/api/*` endpoints. Each accepts POST only; other methods fall through
/// to the 405 handler.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/capture-lead",
            post(handlers::capture_lead).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/subscribe",
            post(handlers::subscribe).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/webhook",
            post(webhook_handler::webhook).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/trigger-automation",
            post(handlers::trigger_automation).fallback(handlers::method_not_allowed),
        )
}

/// CORS for the public site: any origin. Every OPTIONS request is answered
/// here with 200 and an empty body before it reaches a handler.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Assembles the full application around `api` (normally [`api_routes`],
/// possibly wrapped in extra layers such as rate limiting).
pub fn build_router(state: Arc<AppState>, api: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// The application without rate limiting, as used by tests.
pub fn app(state: Arc<AppState>) -> Router {
    build_router(state, api_routes())
}
