//! The overlay's rendering surface.
//!
//! A transparent RGBA raster the size of the viewport. It is cleared at
//! the start of every frame (underlying content shows through the
//! transparent pixels) and resized to match the viewport whenever the
//! viewport changes.

use image::{Rgba, RgbaImage};

/// Full-viewport transparent raster with circle drawing.
pub struct Surface {
    frame: RgbaImage,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { frame: RgbaImage::new(width, height) }
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// The current frame's pixels.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Match the surface to new viewport dimensions. The old frame
    /// content is discarded; callers resize between frames.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.frame.dimensions() {
            self.frame = RgbaImage::new(width, height);
        }
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        for pixel in self.frame.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Composite a filled circle onto the frame with the given extra
    /// alpha. Pixels outside the surface clip silently.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba<u8>, alpha: f64) {
        let alpha = alpha.clamp(0.0, 1.0) * (color[3] as f64 / 255.0);
        if alpha <= 0.0 || radius <= 0.0 {
            return;
        }

        let (w, h) = (self.frame.width() as i64, self.frame.height() as i64);
        let min_x = (cx - radius).floor() as i64;
        let max_x = (cx + radius).ceil() as i64;
        let min_y = (cy - radius).floor() as i64;
        let max_y = (cy + radius).ceil() as i64;
        let r2 = radius * radius;

        for py in min_y.max(0)..=max_y.min(h - 1) {
            for px in min_x.max(0)..=max_x.min(w - 1) {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let dst = *self.frame.get_pixel(px as u32, py as u32);
                let blended = source_over(color, dst, alpha);
                self.frame.put_pixel(px as u32, py as u32, blended);
            }
        }
    }
}

/// Standard source-over compositing with an explicit source alpha.
fn source_over(src: Rgba<u8>, dst: Rgba<u8>, src_alpha: f64) -> Rgba<u8> {
    let sa = src_alpha;
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let sf = s as f64 / 255.0;
        let df = d as f64 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
