//! Frame rasterisation in fixed z-order.
//!
//! 1. Surface sizing and device-pixel-ratio scale
//! 2. Cell backgrounds
//! 3. Grid lines
//! 4. Agent markers and labels
//! 5. Overlay panels
//!
//! Output is a pure function of the frame, the view toggles, the settings,
//! and the theme.

use fieldgrid_types::{CanonicalAgent, Frame, ViewState};
use tracing::trace;

use crate::error::RenderError;
use crate::glyphs;
use crate::overlay;
use crate::surface::Surface;
use crate::theme::Theme;

/// Marker radius as a fraction of the tile side.
pub const MARKER_RADIUS_RATIO: f32 = 0.42;

/// Largest surface, in pixels, a frame may be rendered onto (256 MiB of
/// RGBA).
pub const MAX_SURFACE_PIXELS: u64 = 1 << 26;

/// Horizontal inset of a marker label inside its tile.
const LABEL_INSET: f32 = 4.0;
/// Smallest label font size.
const LABEL_MIN_FONT: f32 = 10.0;
/// Label font size as a fraction of the tile side.
const LABEL_FONT_RATIO: f32 = 0.32;
/// Width of a grid line before scaling.
const GRID_LINE_WIDTH: f32 = 1.0;

/// Geometry knobs for the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Side of one tile in device-independent units.
    pub tile_size: u32,
    /// Device pixels per unit.
    pub device_pixel_ratio: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tile_size: 25,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Pixel dimensions `(width, height)` of the surface for a grid.
///
/// Each side is `floor(count * tile * dpr)`, saturating at `u32::MAX`.
#[allow(clippy::cast_precision_loss)]
pub fn surface_size(rows: usize, cols: usize, tile_size: u32, device_pixel_ratio: f32) -> (u32, u32) {
    let unit = f64::from(tile_size) * f64::from(device_pixel_ratio);
    (
        saturating_pixels(cols as f64 * unit),
        saturating_pixels(rows as f64 * unit),
    )
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn saturating_pixels(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value.floor() as u32
    }
}

/// Draw `frame` onto `surface`, resizing it to fit.
///
/// # Errors
///
/// Returns [`RenderError::SurfaceTooLarge`] when the frame needs more than
/// [`MAX_SURFACE_PIXELS`]; `surface` is left untouched in that case.
#[allow(clippy::cast_precision_loss)]
pub fn render_frame(
    frame: &Frame,
    view: ViewState,
    settings: RenderSettings,
    theme: &Theme,
    surface: &mut Surface,
) -> Result<(), RenderError> {
    let (px_w, px_h) = surface_size(
        frame.rows,
        frame.cols,
        settings.tile_size,
        settings.device_pixel_ratio,
    );
    if u64::from(px_w).saturating_mul(u64::from(px_h)) > MAX_SURFACE_PIXELS {
        return Err(RenderError::SurfaceTooLarge {
            width: px_w,
            height: px_h,
        });
    }
    surface.resize(px_w, px_h);
    surface.set_scale(settings.device_pixel_ratio);

    let tile = settings.tile_size as f32;
    let width = frame.cols as f32 * tile;
    let height = frame.rows as f32 * tile;

    draw_cells(frame, tile, theme, surface);
    draw_grid_lines(frame.rows, frame.cols, tile, theme, surface);
    for agent in &frame.agents {
        draw_agent(agent, tile, theme, surface);
    }
    overlay::compose(frame, view.visible_panels, width, height, theme, surface);

    trace!(
        rows = frame.rows,
        cols = frame.cols,
        agents = frame.agents.len(),
        width = px_w,
        height = px_h,
        "Frame rendered"
    );
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_cells(frame: &Frame, tile: f32, theme: &Theme, surface: &mut Surface) {
    for (y, row) in frame.grid.iter().enumerate() {
        let top = y as f32 * tile;
        for (x, code) in row.iter().enumerate() {
            surface.fill_rect(x as f32 * tile, top, tile, tile, theme.color_for_code(*code));
        }
    }
}

/// Separators centred on every boundary, including the outer edges.
#[allow(clippy::cast_precision_loss)]
fn draw_grid_lines(rows: usize, cols: usize, tile: f32, theme: &Theme, surface: &mut Surface) {
    let width = cols as f32 * tile;
    let height = rows as f32 * tile;
    let half = GRID_LINE_WIDTH / 2.0;
    for k in 0..=cols {
        let x = (k as f32).mul_add(tile, -half);
        surface.fill_rect(x, 0.0, GRID_LINE_WIDTH, height, theme.grid_line);
    }
    for k in 0..=rows {
        let y = (k as f32).mul_add(tile, -half);
        surface.fill_rect(0.0, y, width, GRID_LINE_WIDTH, theme.grid_line);
    }
}

#[allow(clippy::cast_precision_loss)]
fn draw_agent(agent: &CanonicalAgent, tile: f32, theme: &Theme, surface: &mut Surface) {
    let left = agent.position.x as f32 * tile;
    let top = agent.position.y as f32 * tile;
    let cx = tile.mul_add(0.5, left);
    let cy = tile.mul_add(0.5, top);
    surface.fill_circle(cx, cy, tile * MARKER_RADIUS_RATIO, theme.role_color(agent.role));

    let font = (tile * LABEL_FONT_RATIO).max(LABEL_MIN_FONT);
    let label_top = glyphs::text_height(font).mul_add(-0.5, cy);
    surface.fill_text(&agent.label(), left + LABEL_INSET, label_top, font, theme.text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_scales_with_ratio() {
        assert_eq!(surface_size(2, 3, 25, 1.0), (75, 50));
        assert_eq!(surface_size(2, 3, 25, 2.0), (150, 100));
        assert_eq!(surface_size(3, 3, 25, 1.5), (112, 112));
    }

    #[test]
    fn oversized_frame_is_refused_before_allocating() {
        let frame = Frame {
            grid: Vec::new(),
            rows: 100_000,
            cols: 100_000,
            agents: Vec::new(),
            announcements: Vec::new(),
            meta: None,
        };
        let mut surface = Surface::new();
        let result = render_frame(
            &frame,
            ViewState::default(),
            RenderSettings::default(),
            &Theme::standard(),
            &mut surface,
        );
        assert!(matches!(
            result,
            Err(RenderError::SurfaceTooLarge {
                width: 2_500_000,
                height: 2_500_000
            })
        ));
        assert!(surface.is_empty());
    }

    #[test]
    fn degenerate_ratio_yields_empty_size() {
        assert_eq!(surface_size(2, 2, 25, f32::NAN), (0, 0));
        assert_eq!(surface_size(2, 2, 25, -1.0), (0, 0));
    }
}
