//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the chat API under `/api/chat` and serves the
//! embeddable widget (HTML, JS, CSS) as static files for every other path.
//! The widget is embedded on the blog's own origin, so CORS is open.

pub mod chat;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Chat API routes.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat/persona", get(chat::persona))
        .route("/api/chat/sessions", post(chat::create_session))
        .route(
            "/api/chat/sessions/{id}",
            get(chat::get_session).delete(chat::delete_session),
        )
        .route("/api/chat/sessions/{id}/messages", post(chat::send_message))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Resolve the path to the widget asset directory.
fn widget_dir() -> PathBuf {
    resolve_widget_dir(std::env::var("WIDGET_DIR").ok())
}

/// `WIDGET_DIR` if set, else `./widget` when present in the working
/// directory, else the `widget/` directory shipped next to the sources.
fn resolve_widget_dir(configured: Option<String>) -> PathBuf {
    if let Some(dir) = configured.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }
    let local = PathBuf::from("widget");
    if local.is_dir() {
        return local;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("widget")
}

/// API routes plus the widget served as static files at `/`.
pub fn app(state: AppState) -> Router {
    let widget_service = ServeDir::new(widget_dir()).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(widget_service)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
