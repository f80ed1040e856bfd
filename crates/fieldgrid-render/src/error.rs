//! Error types for the render crate.

/// Errors that can occur when sizing or exporting a rendered surface.
///
/// Out-of-range geometry is clipped and unknown cell codes fall back to the
/// empty colour; neither is an error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The surface has no pixels yet (no frame has been drawn).
    #[error("surface is empty")]
    EmptySurface,

    /// The frame would need more than
    /// [`MAX_SURFACE_PIXELS`](crate::pipeline::MAX_SURFACE_PIXELS) pixels.
    #[error("surface of {width}x{height} pixels exceeds the size limit")]
    SurfaceTooLarge {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
