//! Operator HTTP surface for the Fieldgrid grid viewer.
//!
//! Serves the latest rendered frame as PNG next to a small JSON API for
//! the view controls (pause, panel toggles) and for switching between
//! live polling and playback. All handlers share one [`AppState`].
//!
//! # Modules
//!
//! - [`error`] -- [`ViewerError`] with JSON error responses, and the
//!   binary's [`AppError`]
//! - [`handlers`] -- endpoint handlers
//! - [`router`] -- [`build_router`] with CORS and request tracing
//! - [`server`] -- [`start_server`] with `Ctrl-C` shutdown
//! - [`state`] -- [`AppState`]

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::{AppError, ViewerError};
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
