//! Error types for frame acquisition.
//!
//! Fetch-side errors never reach the renderer: the live loop logs them and
//! keeps the last good snapshot. They surface to callers only through
//! [`StatePoller::poll_state`](crate::source::StatePoller::poll_state) and
//! [`attach`](crate::source::attach).

/// Errors produced while acquiring snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The request could not be sent or timed out.
    #[error("state request failed: {0}")]
    Fetch(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("state endpoint returned {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not a snapshot.
    #[error("state response could not be decoded: {0}")]
    Decode(String),

    /// A playback source was attached with no frames.
    #[error("playback requires at least one frame")]
    EmptyPlayback,
}
