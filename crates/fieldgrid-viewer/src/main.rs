//! Fieldgrid viewer binary.
//!
//! Loads `fieldgrid-config.yaml` (defaults when absent), attaches either
//! playback of `source.frames_file` or live polling of the backend, and
//! serves the operator surface until `Ctrl-C`.

use std::path::Path;
use std::sync::Arc;

use fieldgrid_core::config::load_frames;
use fieldgrid_core::{GridView, HttpStatePoller, SourceController, ViewerConfig};
use fieldgrid_viewer::{AppError, AppState, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "fieldgrid-config.yaml";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        state_url = %config.state_url(),
        tile_size = config.render.tile_size,
        "Fieldgrid viewer starting"
    );

    let view = Arc::new(GridView::new(
        config.render_settings(),
        config.initial_view(),
    ));
    let poller = HttpStatePoller::new(config.state_url(), config.request_timeout())?;
    let mut controller = SourceController::new(poller, view, config.source_settings());

    if let Some(path) = &config.source.frames_file {
        let frames = load_frames(path)?;
        info!(path = %path.display(), frames = frames.len(), "Loaded playback frames");
        controller.attach_playback(frames).await?;
    } else {
        controller.attach_live().await?;
    }

    let state = Arc::new(AppState::new(controller, config.source.poll_interval_ms));
    let served = start_server(&config.server, Arc::clone(&state)).await;

    state.controller.lock().await.detach().await;
    info!("Fieldgrid viewer stopped");

    served.map_err(AppError::from)
}

/// Read the config file, or fall back to defaults (plus env overrides)
/// when it does not exist.
fn load_config() -> Result<ViewerConfig, AppError> {
    let path = Path::new(CONFIG_PATH);
    let config = if path.exists() {
        ViewerConfig::from_file(path)?
    } else {
        ViewerConfig::from_env()?
    };
    Ok(config)
}
