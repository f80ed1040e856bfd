//! Operator endpoint handlers for the grid viewer.
//!
//! Reads go straight to the shared [`GridView`](fieldgrid_core::GridView);
//! anything that attaches or detaches a source locks the controller.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | HTML page showing the live frame |
//! | `GET` | `/frame.png` | Latest rendered surface as PNG |
//! | `GET` | `/api/status` | Grid status and view flags |
//! | `POST` | `/api/view/pause` | Toggle pause |
//! | `POST` | `/api/view/panels/{panel}` | Toggle one overlay panel |
//! | `POST` | `/api/source/playback` | Replace the source with playback |
//! | `POST` | `/api/source/live` | Replace the source with live polling |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use fieldgrid_types::{GridSnapshot, Panel, SourceMode};
use serde::Serialize;
use tracing::info;

use crate::error::ViewerError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Answer to a source switch.
#[derive(Debug, Serialize)]
pub struct SourceResponse {
    /// Mode now attached.
    pub mode: SourceMode,
    /// Length of the playback sequence, absent for live mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<usize>,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Minimal page that reloads `/frame.png` and the status badge on a timer.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let refresh_ms = state.refresh_ms;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Fieldgrid Viewer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        #badge {{ color: #8b949e; margin: 0.5rem 0 1rem; }}
        button {{
            background: #161b22;
            color: #c9d1d9;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 0.4rem 0.9rem;
            margin-right: 0.5rem;
            font-family: inherit;
            cursor: pointer;
        }}
        button:hover {{ border-color: #58a6ff; }}
        #frame {{ display: block; margin-top: 1rem; image-rendering: pixelated; }}
    </style>
</head>
<body>
    <h1>Fieldgrid Viewer</h1>
    <div id="badge">GRID STATUS waiting for data</div>
    <div>
        <button onclick="post('/api/view/pause')">Pause / Play</button>
        <button onclick="post('/api/view/panels/legend')">Legend</button>
        <button onclick="post('/api/view/panels/messages')">Messages</button>
        <button onclick="post('/api/view/panels/agent-info')">Agent Info</button>
        <button onclick="post('/api/source/live')">Live</button>
    </div>
    <img id="frame" alt="grid frame">
    <script>
        const frame = document.getElementById('frame');
        const badge = document.getElementById('badge');
        async function post(path) {{
            await fetch(path, {{ method: 'POST' }});
            refresh();
        }}
        async function refresh() {{
            try {{
                const status = await (await fetch('/api/status')).json();
                badge.textContent = status.badge + (status.view.paused ? ' | paused' : '');
                if (status.rows !== null) {{
                    frame.src = '/frame.png?t=' + Date.now();
                }}
            }} catch (e) {{
                badge.textContent = 'viewer unreachable';
            }}
        }}
        refresh();
        setInterval(refresh, {refresh_ms});
    </script>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /frame.png
// ---------------------------------------------------------------------------

/// Encode the current surface as PNG.
///
/// Returns 404 until the first snapshot has been accepted.
pub async fn frame_png(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ViewerError> {
    let png = state.view.encode_png()?.ok_or(ViewerError::NoFrame)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    ))
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Grid status badge, counters, and view flags.
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.view.status())
}

// ---------------------------------------------------------------------------
// POST /api/view/...
// ---------------------------------------------------------------------------

/// Toggle pause on the view and the attached source.
pub async fn toggle_pause(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.controller.lock().await.toggle_pause();
    info!(paused = view.paused, "Pause toggled");
    Json(view)
}

/// Toggle one overlay panel by slug and redraw.
pub async fn toggle_panel(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ViewerError> {
    let panel = Panel::from_slug(&slug)
        .ok_or_else(|| ViewerError::InvalidRequest(format!("unknown panel: {slug}")))?;

    let panels = state.view.toggle_panel(panel);
    info!(
        panel = panel.as_str(),
        visible = panels.is_visible(panel),
        "Panel toggled"
    );
    Ok(Json(state.view.view_state()))
}

// ---------------------------------------------------------------------------
// POST /api/source/...
// ---------------------------------------------------------------------------

/// Replace the current source with playback of the posted frame array.
///
/// The body is decoded here rather than through `Json` so a malformed
/// array gets the same error body as every other failure.
pub async fn attach_playback(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ViewerError> {
    let frames: Vec<GridSnapshot> = serde_json::from_slice(&body)
        .map_err(|e| ViewerError::InvalidRequest(format!("frames must be a JSON array: {e}")))?;
    let count = frames.len();

    let mode = state.controller.lock().await.attach_playback(frames).await?;

    Ok(Json(SourceResponse {
        mode,
        frames: Some(count),
    }))
}

/// Replace the current source with live polling.
pub async fn attach_live(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ViewerError> {
    let mode = state.controller.lock().await.attach_live().await?;
    Ok(Json(SourceResponse { mode, frames: None }))
}
