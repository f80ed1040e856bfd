//! Owner of the attached frame source for one [`GridView`].
//!
//! The controller guarantees at most one source runs per view: switching
//! modes always detaches the current handle before attaching the next, and
//! dropping the controller drops (and therefore cancels) the handle.

use std::sync::Arc;

use fieldgrid_types::{GridSnapshot, SourceMode, ViewState};
use tracing::info;

use crate::engine::GridView;
use crate::error::SourceError;
use crate::source::{self, FrameSink, FrameSource, SourceHandle, SourceSettings, StatePoller};

/// Attaches, switches, pauses, and detaches sources feeding a view.
#[derive(Debug)]
pub struct SourceController<P> {
    poller: P,
    view: Arc<GridView>,
    settings: SourceSettings,
    handle: Option<SourceHandle>,
}

impl<P: StatePoller + Clone> SourceController<P> {
    /// Create a controller with nothing attached.
    ///
    /// `poller` is cloned for every live attach.
    pub const fn new(poller: P, view: Arc<GridView>, settings: SourceSettings) -> Self {
        Self {
            poller,
            view,
            settings,
            handle: None,
        }
    }

    /// The view this controller feeds.
    pub const fn view(&self) -> &Arc<GridView> {
        &self.view
    }

    /// Mode of the attached source, if any.
    pub fn mode(&self) -> Option<SourceMode> {
        self.handle.as_ref().map(SourceHandle::mode)
    }

    /// Replace the current source with live polling.
    ///
    /// # Errors
    ///
    /// Propagates [`source::attach`] errors.
    pub async fn attach_live(&mut self) -> Result<SourceMode, SourceError> {
        self.switch(FrameSource::Live(self.poller.clone())).await
    }

    /// Replace the current source with looping playback of `frames`.
    ///
    /// An empty sequence is rejected and the current source keeps running.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::EmptyPlayback`] when `frames` is empty.
    pub async fn attach_playback(
        &mut self,
        frames: Vec<GridSnapshot>,
    ) -> Result<SourceMode, SourceError> {
        if frames.is_empty() {
            return Err(SourceError::EmptyPlayback);
        }
        self.switch(FrameSource::Playback(frames)).await
    }

    /// Detach the current source, if any.
    pub async fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.detach().await;
        }
        self.view.set_mode(None);
    }

    /// Flip the pause state of the view and the attached source.
    pub fn toggle_pause(&self) -> ViewState {
        let paused = !self.view.view_state().paused;
        if let Some(handle) = &self.handle {
            if paused {
                handle.pause();
            } else {
                handle.resume();
            }
        }
        self.view.set_paused(paused)
    }

    async fn switch(&mut self, next: FrameSource<P>) -> Result<SourceMode, SourceError> {
        let previous = self.mode();
        self.detach().await;

        let settings = SourceSettings {
            start_paused: self.view.view_state().paused,
            ..self.settings
        };
        let sink: Arc<dyn FrameSink> = Arc::clone(&self.view) as Arc<dyn FrameSink>;
        let handle = source::attach(next, sink, &settings)?;
        let mode = handle.mode();
        self.handle = Some(handle);
        self.view.set_mode(Some(mode));

        info!(
            from = previous.map_or("none", SourceMode::as_str),
            to = mode.as_str(),
            "Frame source switched"
        );
        Ok(mode)
    }
}
