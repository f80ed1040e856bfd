//! Frame acquisition and the grid view engine for the Fieldgrid viewer.
//!
//! Data flows one way: a [`FrameSource`](source::FrameSource) produces
//! [`GridSnapshot`](fieldgrid_types::GridSnapshot)s, the
//! [`normalize`](normalize::normalize) step turns raw agents into canonical
//! records, and [`GridView`](engine::GridView) renders the result and keeps
//! it until the next snapshot arrives.
//!
//! # Modules
//!
//! - [`source`] -- Live and playback scheduling, owned handles
//! - [`schedule`] -- Pause flag and delivery gate shared with each task
//! - [`controller`] -- One-source-at-a-time switching for a view
//! - [`engine`] -- Latest frame, view toggles, rendered surface
//! - [`normalize`] -- Agent encodings to [`CanonicalAgent`](fieldgrid_types::CanonicalAgent)
//! - [`http`] -- `reqwest` poller for the backend's state endpoint
//! - [`config`] -- `fieldgrid-config.yaml` loading
//! - [`error`] -- Source errors

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod http;
pub mod normalize;
pub mod schedule;
pub mod source;

pub use config::{ConfigError, ViewerConfig};
pub use controller::SourceController;
pub use engine::{GridStatus, GridView};
pub use error::SourceError;
pub use http::HttpStatePoller;
pub use normalize::{canonicalize, normalize};
pub use source::{
    FrameSink, FrameSource, PlaybackCursor, SourceHandle, SourceSettings, StatePoller, attach,
};
