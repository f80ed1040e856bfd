//! Frame sources and their scheduling handles.
//!
//! A [`FrameSource`] is either a live poller or a finite playback sequence.
//! [`attach`] dispatches on the variant once and spawns a single task that
//! drives it:
//!
//! - **Live**: poll, deliver, sleep for the poll interval, repeat. The next
//!   request is only issued after the previous one resolves. Failures are
//!   logged and the sink keeps its last good snapshot.
//! - **Playback**: deliver the frame at the cursor, advance, sleep for one
//!   tick, repeat, wrapping from the last frame to the first.
//!
//! The returned [`SourceHandle`] owns the task. Pausing suspends the loop
//! without tearing it down; detaching (explicitly or by dropping the
//! handle) closes the delivery gate and aborts the task, after which the
//! sink receives nothing more.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fieldgrid_types::{GridSnapshot, SourceMode};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::schedule::ScheduleControl;

/// Something that can fetch the current snapshot.
pub trait StatePoller: Send + Sync + 'static {
    /// Fetch one complete snapshot, or fail.
    fn poll_state(&self) -> impl Future<Output = Result<GridSnapshot, SourceError>> + Send;
}

/// Receiver of scheduled snapshots.
///
/// Called synchronously from the scheduling task; implementations must not
/// block for long.
pub trait FrameSink: Send + Sync + 'static {
    /// Accept the next snapshot.
    fn apply(&self, snapshot: GridSnapshot);
}

/// Where frames come from.
#[derive(Debug, Clone)]
pub enum FrameSource<P> {
    /// Poll a backend at a fixed cadence.
    Live(P),
    /// Loop over a finite, pre-supplied sequence.
    Playback(Vec<GridSnapshot>),
}

impl<P> FrameSource<P> {
    /// The mode this source runs in.
    pub const fn mode(&self) -> SourceMode {
        match self {
            Self::Live(_) => SourceMode::Live,
            Self::Playback(_) => SourceMode::Playback,
        }
    }
}

/// Cadences for the scheduling task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSettings {
    /// Delay after each live poll resolves.
    pub poll_interval: Duration,
    /// Delay between playback frames.
    pub playback_tick: Duration,
    /// Attach in the paused state.
    pub start_paused: bool,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(300),
            playback_tick: Duration::from_millis(16),
            start_paused: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Playback cursor
// ---------------------------------------------------------------------------

/// Looping position within a playback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackCursor {
    len: usize,
    next: usize,
    shown: Option<usize>,
}

impl PlaybackCursor {
    /// A cursor over `len` frames, or `None` when `len` is zero.
    pub const fn new(len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            len,
            next: 0,
            shown: None,
        })
    }

    /// Index of the frame that the next tick shows.
    pub const fn peek(&self) -> usize {
        self.next
    }

    /// Show the next frame: returns its index and moves on, wrapping to 0
    /// after the last frame.
    pub const fn advance(&mut self) -> usize {
        let current = self.next;
        let following = current.saturating_add(1);
        self.next = if following >= self.len { 0 } else { following };
        self.shown = Some(current);
        current
    }

    /// Index of the frame most recently shown.
    pub const fn index(&self) -> Option<usize> {
        self.shown
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Owned scheduling handle for one attached source.
///
/// Dropping the handle detaches the source.
#[derive(Debug)]
pub struct SourceHandle {
    mode: SourceMode,
    control: Arc<ScheduleControl>,
    task: Option<JoinHandle<()>>,
}

impl SourceHandle {
    /// Mode of the attached source.
    pub const fn mode(&self) -> SourceMode {
        self.mode
    }

    /// Whether scheduling is suspended.
    pub fn is_paused(&self) -> bool {
        self.control.is_paused()
    }

    /// Suspend scheduling. A live request already in flight completes, but
    /// its result is discarded.
    pub fn pause(&self) {
        self.control.pause();
        info!(mode = self.mode.as_str(), "Frame source paused");
    }

    /// Resume scheduling.
    pub fn resume(&self) {
        self.control.resume();
        info!(mode = self.mode.as_str(), "Frame source resumed");
    }

    /// Flip between paused and running; returns the new paused state.
    pub fn toggle_pause(&self) -> bool {
        if self.is_paused() {
            self.resume();
            false
        } else {
            self.pause();
            true
        }
    }

    /// Stop the source and wait for its task to end.
    ///
    /// No delivery reaches the sink once this is called.
    pub async fn detach(mut self) {
        self.control.close();
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancellation surfaces as a JoinError; nothing to report.
            let _ = task.await;
        }
        info!(mode = self.mode.as_str(), "Frame source detached");
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.control.close();
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(mode = self.mode.as_str(), "Frame source dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// Attach
// ---------------------------------------------------------------------------

/// Start driving `source` into `sink`.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns [`SourceError::EmptyPlayback`] for a playback source with no
/// frames.
pub fn attach<P: StatePoller>(
    source: FrameSource<P>,
    sink: Arc<dyn FrameSink>,
    settings: &SourceSettings,
) -> Result<SourceHandle, SourceError> {
    let mode = source.mode();
    let control = Arc::new(ScheduleControl::new(settings.start_paused));
    let task_control = Arc::clone(&control);

    let task = match source {
        FrameSource::Live(poller) => {
            info!(
                mode = mode.as_str(),
                interval_ms = settings.poll_interval.as_millis(),
                paused = settings.start_paused,
                "Frame source attached"
            );
            tokio::spawn(run_live(poller, sink, task_control, settings.poll_interval))
        }
        FrameSource::Playback(frames) => {
            let cursor = PlaybackCursor::new(frames.len()).ok_or(SourceError::EmptyPlayback)?;
            info!(
                mode = mode.as_str(),
                frames = frames.len(),
                tick_ms = settings.playback_tick.as_millis(),
                paused = settings.start_paused,
                "Frame source attached"
            );
            tokio::spawn(run_playback(
                frames,
                cursor,
                sink,
                task_control,
                settings.playback_tick,
            ))
        }
    };

    Ok(SourceHandle {
        mode,
        control,
        task: Some(task),
    })
}

async fn run_live<P: StatePoller>(
    poller: P,
    sink: Arc<dyn FrameSink>,
    control: Arc<ScheduleControl>,
    interval: Duration,
) {
    loop {
        control.wait_if_paused().await;
        if control.is_stopped() {
            break;
        }

        match poller.poll_state().await {
            Ok(snapshot) => {
                if !control.deliver(|| sink.apply(snapshot)) {
                    debug!("Snapshot arrived while paused or detached; discarded");
                }
            }
            Err(e) => {
                warn!(error = %e, "State poll failed; keeping last snapshot");
            }
        }

        tokio::time::sleep(interval).await;
    }
}

async fn run_playback(
    frames: Vec<GridSnapshot>,
    mut cursor: PlaybackCursor,
    sink: Arc<dyn FrameSink>,
    control: Arc<ScheduleControl>,
    tick: Duration,
) {
    loop {
        control.wait_if_paused().await;
        if control.is_stopped() {
            break;
        }

        let Some(frame) = frames.get(cursor.peek()) else {
            break;
        };
        if control.deliver(|| sink.apply(frame.clone())) {
            let shown = cursor.advance();
            debug!(index = shown, frames = frames.len(), "Playback frame shown");
        }

        tokio::time::sleep(tick).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_after_last_frame() {
        let mut cursor = PlaybackCursor::new(3).unwrap();
        let shown: Vec<_> = (0..4).map(|_| cursor.advance()).collect();
        assert_eq!(shown, [0, 1, 2, 0]);
        assert_eq!(cursor.index(), Some(0));
        assert_eq!(cursor.peek(), 1);
    }

    #[test]
    fn cursor_over_one_frame_stays_put() {
        let mut cursor = PlaybackCursor::new(1).unwrap();
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.advance(), 0);
    }

    #[test]
    fn empty_cursor_is_rejected() {
        assert!(PlaybackCursor::new(0).is_none());
    }

    #[test]
    fn source_reports_mode() {
        let live: FrameSource<()> = FrameSource::Live(());
        let playback: FrameSource<()> = FrameSource::Playback(Vec::new());
        assert_eq!(live.mode(), SourceMode::Live);
        assert_eq!(playback.mode(), SourceMode::Playback);
    }
}
