//! Pixel-level helpers shared by the layout engine and the text compositor.
//!
//! All drawing clips silently against the canvas bounds, so callers can pass
//! rectangles and origins that hang off an edge.

use image::{ImageBuffer, Rgb, RgbImage};

/// Axis-aligned pixel rectangle. Coordinates are signed so that text blocks
/// anchored above the canvas top can still be described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// One past the bottom row
    pub fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }

    /// One past the right column
    pub fn right(&self) -> i64 {
        self.x + self.width as i64
    }
}

/// Create a canvas with the given dimensions filled with the specified color
pub fn filled(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    ImageBuffer::from_pixel(width, height, Rgb(color))
}

/// Fill `rect` with a solid color
pub fn fill_rect(canvas: &mut RgbImage, rect: Rect, color: [u8; 3]) {
    let (x0, x1) = clip_span(rect.x, rect.right(), canvas.width());
    let (y0, y1) = clip_span(rect.y, rect.bottom(), canvas.height());

    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, Rgb(color));
        }
    }
}

/// Copy `src` onto `canvas` with its top-left corner at (x, y)
pub fn paste(canvas: &mut RgbImage, src: &RgbImage, x: i64, y: i64) {
    let (x0, x1) = clip_span(x, x + src.width() as i64, canvas.width());
    let (y0, y1) = clip_span(y, y + src.height() as i64, canvas.height());

    for cy in y0..y1 {
        let sy = (cy as i64 - y) as u32;
        for cx in x0..x1 {
            let sx = (cx as i64 - x) as u32;
            canvas.put_pixel(cx, cy, *src.get_pixel(sx, sy));
        }
    }
}

/// Blend a premultiplied-alpha sample over the pixel at (x, y)
pub fn blend_premultiplied(canvas: &mut RgbImage, x: i64, y: i64, rgba: [u8; 4]) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }

    let alpha = rgba[3] as u32;
    if alpha == 0 {
        return;
    }

    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    let inverse = 255 - alpha;
    for c in 0..3 {
        let blended = rgba[c] as u32 + (pixel[c] as u32 * inverse + 127) / 255;
        pixel[c] = blended.min(255) as u8;
    }
}

fn clip_span(start: i64, end: i64, limit: u32) -> (u32, u32) {
    let lo = start.clamp(0, limit as i64) as u32;
    let hi = end.clamp(0, limit as i64) as u32;
    (lo, hi.max(lo))
}
