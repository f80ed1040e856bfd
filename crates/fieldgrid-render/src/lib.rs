//! Rendering for the Fieldgrid viewer.
//!
//! Turns a normalized [`Frame`](fieldgrid_types::Frame) into pixels on an
//! owned [`Surface`], then exports them as PNG on demand. Everything here is
//! synchronous and deterministic; scheduling lives in `fieldgrid-core`.
//!
//! # Modules
//!
//! - [`surface`] -- RGBA surface, primitives, PNG export
//! - [`pipeline`] -- Layered frame rasterisation
//! - [`overlay`] -- Legend, messages, and agent info panels
//! - [`theme`] -- Static colour tables
//! - [`glyphs`] -- Embedded bitmap font
//! - [`error`] -- Sizing and export errors

pub mod error;
pub mod glyphs;
pub mod overlay;
pub mod pipeline;
pub mod surface;
pub mod theme;

pub use error::RenderError;
pub use overlay::{announcement_text, recent_messages};
pub use pipeline::{MAX_SURFACE_PIXELS, RenderSettings, render_frame, surface_size};
pub use surface::Surface;
pub use theme::{STANDARD_THEME, Theme};
