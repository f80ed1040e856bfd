//! Shared state handed to every request handler.

use std::sync::Arc;

use fieldgrid_core::{GridView, HttpStatePoller, SourceController};
use tokio::sync::Mutex;

/// The view being served and the controller that feeds it.
///
/// The controller sits behind an async mutex because attach and detach
/// await the outgoing task; the view has its own internal lock and is read
/// without touching the controller.
#[derive(Debug)]
pub struct AppState {
    /// Rendered surface, current frame, and view flags.
    pub view: Arc<GridView>,
    /// Owner of the attached frame source.
    pub controller: Mutex<SourceController<HttpStatePoller>>,
    /// How often the HTML page reloads `/frame.png`, in milliseconds.
    pub refresh_ms: u64,
}

impl AppState {
    /// Bundle a controller for serving. The view is taken from the
    /// controller so both always refer to the same [`GridView`].
    pub fn new(controller: SourceController<HttpStatePoller>, refresh_ms: u64) -> Self {
        Self {
            view: Arc::clone(controller.view()),
            controller: Mutex::new(controller),
            refresh_ms,
        }
    }
}
