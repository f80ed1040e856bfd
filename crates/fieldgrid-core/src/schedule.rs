//! Shared pause and cancellation state for one attached frame source.
//!
//! The scheduling task and its [`SourceHandle`](crate::source::SourceHandle)
//! both hold an `Arc<ScheduleControl>`. Pausing is lock-free; delivery to
//! the sink runs behind a gate so that once [`close`](ScheduleControl::close)
//! returns, no further frame can reach the sink, even from a task that has
//! not yet observed the abort.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::Notify;

/// Pause flag, resume notification, and a delivery gate.
#[derive(Debug)]
pub struct ScheduleControl {
    /// Whether scheduling is suspended.
    paused: AtomicBool,

    /// Wakes the scheduling task on resume or close.
    resume_notify: Notify,

    /// Set once by [`close`](Self::close); never cleared.
    stopped: AtomicBool,

    /// `true` while frames may be delivered.
    gate: Mutex<bool>,
}

impl ScheduleControl {
    /// Create an open control, optionally starting paused.
    pub fn new(start_paused: bool) -> Self {
        Self {
            paused: AtomicBool::new(start_paused),
            resume_notify: Notify::new(),
            stopped: AtomicBool::new(false),
            gate: Mutex::new(true),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Whether scheduling is suspended.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Suspend scheduling. The task parks at its next wait point.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume scheduling and wake the task.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until scheduling is neither paused nor stopped.
    ///
    /// Returns immediately when running or once [`close`](Self::close) has
    /// been called.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stopped() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Whether the source has been detached.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Close the delivery gate and wake a parked task.
    ///
    /// Blocks while a delivery is in progress; afterwards
    /// [`deliver`](Self::deliver) never runs its closure again.
    pub fn close(&self) {
        self.stopped.store(true, Ordering::Release);
        let mut open = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        *open = false;
        drop(open);
        self.resume_notify.notify_one();
    }

    /// Run `f` if the gate is open and scheduling is not paused.
    ///
    /// Returns whether `f` ran.
    pub fn deliver(&self, f: impl FnOnce()) -> bool {
        let open = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if !*open || self.is_paused() {
            return false;
        }
        f();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deliver_runs_while_open() {
        let control = ScheduleControl::new(false);
        let mut ran = false;
        assert!(control.deliver(|| ran = true));
        assert!(ran);
    }

    #[test]
    fn close_blocks_later_deliveries() {
        let control = ScheduleControl::new(false);
        control.close();
        assert!(control.is_stopped());
        assert!(!control.deliver(|| {}));
    }

    #[test]
    fn paused_control_discards_deliveries() {
        let control = ScheduleControl::new(true);
        assert!(control.is_paused());
        assert!(!control.deliver(|| {}));
        control.resume();
        assert!(control.deliver(|| {}));
    }

    #[tokio::test]
    async fn wait_returns_after_close() {
        let control = std::sync::Arc::new(ScheduleControl::new(true));
        let waiter = {
            let control = std::sync::Arc::clone(&control);
            tokio::spawn(async move { control.wait_if_paused().await })
        };
        control.close();
        assert!(waiter.await.is_ok());
    }

    #[tokio::test]
    async fn wait_returns_after_resume() {
        let control = std::sync::Arc::new(ScheduleControl::new(true));
        let waiter = {
            let control = std::sync::Arc::clone(&control);
            tokio::spawn(async move { control.wait_if_paused().await })
        };
        control.resume();
        assert!(waiter.await.is_ok());
    }
}
