//! Axum router construction for the viewer.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the viewer router. See [`handlers`] for the endpoint table.
///
/// CORS allows any origin so a separately hosted dashboard can embed the
/// frame and drive the controls.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/frame.png", get(handlers::frame_png))
        .route("/api/status", get(handlers::status))
        // View controls
        .route("/api/view/pause", post(handlers::toggle_pause))
        .route("/api/view/panels/{panel}", post(handlers::toggle_panel))
        // Source switching
        .route("/api/source/playback", post(handlers::attach_playback))
        .route("/api/source/live", post(handlers::attach_live))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
