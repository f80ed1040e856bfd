//! The grid view engine: latest frame, view toggles, and rendered pixels.
//!
//! [`GridView`] is the [`FrameSink`] every source feeds. Applying a snapshot
//! normalizes it, renders it, and swaps it in under one lock, so readers
//! never observe a grid from one snapshot paired with agents or pixels from
//! another. Malformed snapshots are skipped and the previous frame stays on
//! screen.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use fieldgrid_render::{RenderError, RenderSettings, Surface, Theme, render_frame};
use fieldgrid_types::{Frame, GridSnapshot, Panel, SnapshotMeta, SourceMode, ViewState, VisiblePanels};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::normalize::canonicalize;
use crate::source::FrameSink;

/// Summary of what the engine is currently showing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridStatus {
    /// Grid rows, once a frame has been applied.
    pub rows: Option<usize>,
    /// Grid columns, once a frame has been applied.
    pub cols: Option<usize>,
    /// Agents in the current frame.
    pub agents: usize,
    /// Whether scheduling is suspended.
    pub paused: bool,
    /// Mode of the attached source, if any.
    pub mode: Option<SourceMode>,
    /// Snapshots rendered since start.
    pub frames_applied: u64,
    /// Snapshots skipped as malformed.
    pub frames_rejected: u64,
    /// When the current frame was applied.
    pub last_applied_at: Option<DateTime<Utc>>,
    /// Backend counters for the current frame.
    pub meta: Option<SnapshotMeta>,
    /// Presentation toggles.
    pub view: ViewState,
    /// One-line summary, e.g. `GRID STATUS 20×20 | Agents: 4`.
    pub badge: String,
}

#[derive(Debug)]
struct ViewInner {
    frame: Option<Frame>,
    view: ViewState,
    surface: Surface,
    mode: Option<SourceMode>,
    frames_applied: u64,
    frames_rejected: u64,
    last_applied_at: Option<DateTime<Utc>>,
}

/// Holds the latest frame and its rendering.
#[derive(Debug)]
pub struct GridView {
    inner: Mutex<ViewInner>,
    settings: RenderSettings,
    theme: Theme,
}

impl GridView {
    /// Create an empty view with the standard theme.
    pub fn new(settings: RenderSettings, view: ViewState) -> Self {
        Self::with_theme(settings, view, Theme::standard())
    }

    /// Create an empty view with a custom palette.
    pub fn with_theme(settings: RenderSettings, view: ViewState, theme: Theme) -> Self {
        Self {
            inner: Mutex::new(ViewInner {
                frame: None,
                view,
                surface: Surface::new(),
                mode: None,
                frames_applied: 0,
                frames_rejected: 0,
                last_applied_at: None,
            }),
            settings,
            theme,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Normalize, render, and show `snapshot`.
    ///
    /// Returns `false` (leaving the previous frame and pixels untouched)
    /// when the snapshot has no usable grid or is too large to render.
    pub fn apply(&self, snapshot: GridSnapshot) -> bool {
        let Some(frame) = canonicalize(snapshot) else {
            let mut inner = self.lock();
            inner.frames_rejected = inner.frames_rejected.saturating_add(1);
            warn!(
                rejected = inner.frames_rejected,
                "Skipping snapshot without a rectangular grid"
            );
            return false;
        };

        let mut inner = self.lock();
        let inner = &mut *inner;
        if let Err(e) =
            render_frame(&frame, inner.view, self.settings, &self.theme, &mut inner.surface)
        {
            inner.frames_rejected = inner.frames_rejected.saturating_add(1);
            warn!(
                rows = frame.rows,
                cols = frame.cols,
                error = %e,
                "Skipping snapshot that cannot be rendered"
            );
            return false;
        }
        debug!(
            rows = frame.rows,
            cols = frame.cols,
            agents = frame.agents.len(),
            "Snapshot applied"
        );
        inner.frame = Some(frame);
        inner.frames_applied = inner.frames_applied.saturating_add(1);
        inner.last_applied_at = Some(Utc::now());
        true
    }

    /// Flip one overlay panel and redraw; returns the new panel set.
    pub fn toggle_panel(&self, panel: Panel) -> VisiblePanels {
        let mut inner = self.lock();
        let visible = inner.view.visible_panels.toggle(panel);
        info!(panel = panel.as_str(), visible, "Overlay toggled");
        self.redraw(&mut inner);
        inner.view.visible_panels
    }

    /// Record the pause state; returns the updated view.
    pub fn set_paused(&self, paused: bool) -> ViewState {
        let mut inner = self.lock();
        inner.view.paused = paused;
        inner.view
    }

    /// Record which kind of source is attached.
    pub fn set_mode(&self, mode: Option<SourceMode>) {
        self.lock().mode = mode;
    }

    /// Current presentation toggles.
    pub fn view_state(&self) -> ViewState {
        self.lock().view
    }

    /// The frame currently shown, if any.
    pub fn frame(&self) -> Option<Frame> {
        self.lock().frame.clone()
    }

    /// Read the rendered surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&Surface) -> R) -> R {
        f(&self.lock().surface)
    }

    /// Encode the current rendering as PNG, or `None` before the first
    /// frame.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if encoding fails.
    pub fn encode_png(&self) -> Result<Option<Vec<u8>>, RenderError> {
        let inner = self.lock();
        if inner.frame.is_none() {
            return Ok(None);
        }
        inner.surface.encode_png().map(Some)
    }

    /// What is on screen right now.
    pub fn status(&self) -> GridStatus {
        let inner = self.lock();
        let frame = inner.frame.as_ref();
        let agents = frame.map_or(0, |f| f.agents.len());
        let badge = frame.map_or_else(
            || String::from("GRID STATUS waiting for data"),
            |f| format!("GRID STATUS {}×{} | Agents: {agents}", f.rows, f.cols),
        );
        GridStatus {
            rows: frame.map(|f| f.rows),
            cols: frame.map(|f| f.cols),
            agents,
            paused: inner.view.paused,
            mode: inner.mode,
            frames_applied: inner.frames_applied,
            frames_rejected: inner.frames_rejected,
            last_applied_at: inner.last_applied_at,
            meta: frame.and_then(|f| f.meta.clone()),
            view: inner.view,
            badge,
        }
    }

    fn redraw(&self, inner: &mut ViewInner) {
        if let Some(frame) = &inner.frame {
            if let Err(e) =
                render_frame(frame, inner.view, self.settings, &self.theme, &mut inner.surface)
            {
                warn!(error = %e, "Redraw failed");
            }
        }
    }
}

impl FrameSink for GridView {
    fn apply(&self, snapshot: GridSnapshot) {
        // Rejections are counted and logged inside.
        let _ = Self::apply(self, snapshot);
    }
}
