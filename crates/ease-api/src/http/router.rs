//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, request tracing.
//! The web front end is a separate deployment; this service is API-only.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Sessions
        .route("/sessions", post(handlers::session::create_session))
        .route("/sessions/{id}", get(handlers::session::get_session))
        .route("/sessions/{id}", delete(handlers::session::end_session))
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages).post(handlers::session::send_message),
        )
        .route("/sessions/{id}/mode", put(handlers::session::set_mode))
        // Voice turns
        .route(
            "/sessions/{id}/voice/toggle",
            post(handlers::voice::toggle_voice),
        )
        // History sidebar
        .route("/history", get(handlers::history::list_history))
        .route("/history/{id}", get(handlers::history::get_history_entry));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health_check() -> &'static str {
    "ok"
}
