//! Owned RGBA pixel surface with a device-pixel-ratio transform.
//!
//! All drawing operations take coordinates in device-independent units
//! (tile space). The surface multiplies them by its scale before
//! rasterising, so a frame drawn at `scale = 2` covers four times the
//! pixels of the same frame at `scale = 1` with identical geometry.
//!
//! A pixel is covered by a shape when its centre lies inside the shape.
//! Colours are composited source-over; geometry outside the surface is
//! clipped.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::RenderError;
use crate::glyphs::{self, GLYPH_ADVANCE, GLYPH_WIDTH};

/// Fully transparent black.
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A raster surface backed by an [`RgbaImage`].
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
    scale: f32,
}

impl Surface {
    /// Create an empty (0 x 0) surface with unit scale.
    pub fn new() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
            scale: 1.0,
        }
    }

    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the surface has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Current unit-to-pixel scale.
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Borrow the backing image.
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Read one device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Set the backing store to `width x height` pixels and clear it.
    ///
    /// The allocation is reused when the dimensions are unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.image.width() == width && self.image.height() == height {
            self.clear();
        } else {
            self.image = RgbaImage::from_pixel(width, height, TRANSPARENT);
        }
    }

    /// Set the unit-to-pixel scale. Non-finite or non-positive values
    /// reset it to 1.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
    }

    /// Clear every pixel to transparent.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba<u8>) {
        let Some((x0, x1)) = self.span(x, x + w, self.width()) else {
            return;
        };
        let Some((y0, y1)) = self.span(y, y + h, self.height()) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    /// Fill a circle centred on `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
        if radius <= 0.0 {
            return;
        }
        let Some((x0, x1)) = self.span(cx - radius, cx + radius, self.width()) else {
            return;
        };
        let Some((y0, y1)) = self.span(cy - radius, cy + radius, self.height()) else {
            return;
        };
        let r2 = radius * radius;
        for py in y0..y1 {
            let dy = self.unit_center(py) - cy;
            for px in x0..x1 {
                let dx = self.unit_center(px) - cx;
                if dx.mul_add(dx, dy * dy) <= r2 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Fill a rectangle with rounded corners.
    ///
    /// The corner radius is clamped to half the shorter side.
    pub fn fill_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        color: Rgba<u8>,
    ) {
        let Some((x0, x1)) = self.span(x, x + w, self.width()) else {
            return;
        };
        let Some((y0, y1)) = self.span(y, y + h, self.height()) else {
            return;
        };
        let r = radius.clamp(0.0, w.min(h) / 2.0);
        let r2 = r * r;
        for py in y0..y1 {
            let uy = self.unit_center(py);
            let dy = corner_overshoot(uy, y + r, y + h - r);
            for px in x0..x1 {
                let ux = self.unit_center(px);
                let dx = corner_overshoot(ux, x + r, x + w - r);
                if dx.mul_add(dx, dy * dy) <= r2 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, top)`.
    ///
    /// `size` is the nominal font size in units; glyphs are
    /// `0.6 * size` wide and `0.7 * size` tall. Returns the advance width.
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_text(&mut self, text: &str, x: f32, top: f32, size: f32, color: Rgba<u8>) -> f32 {
        let dot = glyphs::dot_size(size);
        let advance = dot * f32::from(GLYPH_ADVANCE);
        let mut pen = x;
        for ch in text.chars() {
            let rows = glyphs::glyph(ch);
            for (row_index, bits) in rows.iter().enumerate() {
                let gy = (row_index as f32).mul_add(dot, top);
                for column in 0..GLYPH_WIDTH {
                    if glyphs::is_set(*bits, column) {
                        let gx = f32::from(column).mul_add(dot, pen);
                        self.fill_rect(gx, gy, dot, dot, color);
                    }
                }
            }
            pen += advance;
        }
        pen - x
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Encode the surface as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptySurface`] before anything has been
    /// drawn, or [`RenderError::Encode`] if the encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        if self.is_empty() {
            return Err(RenderError::EmptySurface);
        }
        let mut cursor = Cursor::new(Vec::new());
        self.image.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Device pixels whose centres fall inside `[start, end)` units.
    fn span(&self, start: f32, end: f32, limit: u32) -> Option<(u32, u32)> {
        let first = clamp_pixel((start * self.scale - 0.5).ceil(), limit);
        let last = clamp_pixel((end * self.scale - 0.5).ceil(), limit);
        (first < last).then_some((first, last))
    }

    /// Unit-space coordinate of a device pixel's centre.
    #[allow(clippy::cast_precision_loss)]
    fn unit_center(&self, pixel: u32) -> f32 {
        (pixel as f32 + 0.5) / self.scale
    }

    fn blend(&mut self, x: u32, y: u32, src: Rgba<u8>) {
        if let Some(dst) = self.image.get_pixel_mut_checked(x, y) {
            *dst = source_over(*dst, src);
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

/// Distance by which `value` lies outside `[low, high]`, or 0 inside.
fn corner_overshoot(value: f32, low: f32, high: f32) -> f32 {
    if value < low {
        low - value
    } else if value > high {
        value - high
    } else {
        0.0
    }
}

/// Clamp a pixel coordinate into `[0, limit]`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn clamp_pixel(value: f32, limit: u32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= limit as f32 {
        limit
    } else {
        value as u32
    }
}

/// Composite `src` over `dst` (straight alpha).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let [sr, sg, sb, sa] = src.0;
    if sa == u8::MAX {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let [dr, dg, db, da] = dst.0;
    let src_a = f32::from(sa) / 255.0;
    let dst_a = f32::from(da) / 255.0 * (1.0 - src_a);
    let out_a = src_a + dst_a;
    let channel = |s: u8, d: u8| -> u8 {
        let value = f32::from(s).mul_add(src_a, f32::from(d) * dst_a) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(sr, dr),
        channel(sg, dg),
        channel(sb, db),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn fill_rect_covers_pixel_centres_at_scale() {
        let mut surface = Surface::new();
        surface.resize(20, 20);
        surface.set_scale(2.0);
        surface.fill_rect(1.0, 1.0, 2.0, 2.0, RED);

        // Units [1, 3) map to pixels [2, 6).
        assert_eq!(surface.pixel(2, 2), Some(RED));
        assert_eq!(surface.pixel(5, 5), Some(RED));
        assert_eq!(surface.pixel(1, 2), Some(TRANSPARENT));
        assert_eq!(surface.pixel(6, 5), Some(TRANSPARENT));
    }

    #[test]
    fn drawing_outside_bounds_is_clipped() {
        let mut surface = Surface::new();
        surface.resize(4, 4);
        surface.fill_rect(-10.0, -10.0, 100.0, 100.0, RED);
        surface.fill_circle(50.0, 50.0, 3.0, RED);
        assert_eq!(surface.pixel(0, 0), Some(RED));
        assert_eq!(surface.pixel(3, 3), Some(RED));
        assert!(surface.pixel(4, 4).is_none());
    }

    #[test]
    fn translucent_fill_blends_over_opaque() {
        let mut surface = Surface::new();
        surface.resize(1, 1);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Rgba([255, 255, 255, 255]));
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Rgba([0, 0, 0, 128]));
        let pixel = surface.pixel(0, 0).unwrap();
        assert_eq!(pixel.0[3], 255);
        assert!((126..=128).contains(&pixel.0[0]));
    }

    #[test]
    fn circle_respects_radius() {
        let mut surface = Surface::new();
        surface.resize(21, 21);
        surface.fill_circle(10.5, 10.5, 5.0, RED);
        assert_eq!(surface.pixel(10, 10), Some(RED));
        assert_eq!(surface.pixel(10, 6), Some(RED));
        assert_eq!(surface.pixel(10, 4), Some(TRANSPARENT));
        assert_eq!(surface.pixel(6, 6), Some(TRANSPARENT));
    }

    #[test]
    fn rounded_rect_trims_corners() {
        let mut surface = Surface::new();
        surface.resize(20, 20);
        surface.fill_rounded_rect(0.0, 0.0, 20.0, 20.0, 8.0, RED);
        assert_eq!(surface.pixel(0, 0), Some(TRANSPARENT));
        assert_eq!(surface.pixel(10, 0), Some(RED));
        assert_eq!(surface.pixel(10, 10), Some(RED));
        assert_eq!(surface.pixel(19, 19), Some(TRANSPARENT));
    }

    #[test]
    fn resize_clears_pixels() {
        let mut surface = Surface::new();
        surface.resize(3, 3);
        surface.fill_rect(0.0, 0.0, 3.0, 3.0, RED);
        surface.resize(3, 3);
        assert_eq!(surface.pixel(1, 1), Some(TRANSPARENT));
    }

    #[test]
    fn empty_surface_does_not_encode() {
        let surface = Surface::new();
        assert!(matches!(surface.encode_png(), Err(RenderError::EmptySurface)));
    }

    #[test]
    fn png_has_signature() {
        let mut surface = Surface::new();
        surface.resize(2, 2);
        let bytes = surface.encode_png().unwrap();
        assert_eq!(bytes.get(..8), Some(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a][..]));
    }

    #[test]
    fn text_advance_matches_glyph_metrics() {
        let mut surface = Surface::new();
        surface.resize(100, 20);
        let advance = surface.fill_text("A12", 0.0, 0.0, 10.0, RED);
        assert!((advance - 18.0).abs() < 1e-4);
    }
}
