//! In-memory `0xAARRGGBB` raster surface with image export

use std::path::Path;

use iced::Color;
use image::{ImageResult, Rgb, RgbImage};

use super::{DrawContext, Surface, SurfaceError};
use crate::theme::pack_argb;

/// Largest backing store a context will be handed out for (16384 x 16384)
pub const MAX_BACKING_PIXELS: u64 = 16_384 * 16_384;

/// Software surface backed by a `Vec<u32>`
///
/// Rectangle edges are rounded to whole device pixels and clipped to the
/// backing store. Pixels are overwritten, never blended.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    device_pixel_ratio: f32,
    width: u32,
    height: u32,
    css_width: f32,
    css_height: f32,
    buffer: Vec<u32>,
    scale: (f32, f32),
    image_smoothing: bool,
}

impl PixelBuffer {
    /// Empty surface for a display with the given pixel ratio
    pub fn new(device_pixel_ratio: f32) -> Self {
        Self {
            device_pixel_ratio,
            width: 0,
            height: 0,
            css_width: 0.0,
            css_height: 0.0,
            buffer: Vec::new(),
            scale: (1.0, 1.0),
            image_smoothing: true,
        }
    }

    /// Raw pixels, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.buffer
    }

    /// Pixel at device coordinates
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.buffer.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn image_smoothing(&self) -> bool {
        self.image_smoothing
    }

    /// Copy the buffer into an RGB image, dropping alpha
    ///
    /// An oversized (unallocated) surface converts to a black image.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let argb = self.pixel(x, y).unwrap_or(0);
            Rgb([(argb >> 16) as u8, (argb >> 8) as u8, argb as u8])
        })
    }

    /// Save the buffer to `path`, choosing the format from its extension
    pub fn save_image(&self, path: &Path) -> ImageResult<()> {
        self.to_rgb_image().save(path)
    }

    fn is_allocatable(width: u32, height: u32) -> bool {
        width as u64 * height as u64 <= MAX_BACKING_PIXELS
    }
}

impl Surface for PixelBuffer {
    type Context = Self;

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.buffer.clear();
        if Self::is_allocatable(width, height) {
            self.buffer.resize(width as usize * height as usize, 0);
        }
        // Resizing a canvas resets its context state
        self.scale = (1.0, 1.0);
        self.image_smoothing = true;
    }

    fn css_size(&self) -> (f32, f32) {
        (self.css_width, self.css_height)
    }

    fn set_css_size(&mut self, width: f32, height: f32) {
        self.css_width = width;
        self.css_height = height;
    }

    fn context(&mut self) -> Result<&mut Self::Context, SurfaceError> {
        if !Self::is_allocatable(self.width, self.height) {
            return Err(SurfaceError::ContextUnavailable(format!(
                "backing store {}x{} exceeds {} pixels",
                self.width, self.height, MAX_BACKING_PIXELS
            )));
        }
        Ok(self)
    }
}

impl DrawContext for PixelBuffer {
    fn set_transform(&mut self, scale_x: f32, scale_y: f32) {
        self.scale = (scale_x, scale_y);
    }

    fn transform(&self) -> (f32, f32) {
        self.scale
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.image_smoothing = enabled;
    }

    fn clear(&mut self, color: Color) {
        self.buffer.fill(pack_argb(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (sx, sy) = self.scale;
        let (x0, x1) = device_span(x * sx, (x + width) * sx, self.width);
        let (y0, y1) = device_span(y * sy, (y + height) * sy, self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let argb = pack_argb(color);
        let stride = self.width as usize;
        for row in y0..y1 {
            let start = row * stride;
            self.buffer[start + x0..start + x1].fill(argb);
        }
    }
}

/// Round a logical span to device pixels and clip it to `[0, limit)`
fn device_span(a: f32, b: f32, limit: u32) -> (usize, usize) {
    if a.is_nan() || b.is_nan() {
        return (0, 0);
    }
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let clip = |v: f32| v.round().clamp(0.0, limit as f32) as usize;
    (clip(lo), clip(hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::from_rgb(1.0, 0.0, 0.0);

    fn surface(width: u32, height: u32) -> PixelBuffer {
        let mut surface = PixelBuffer::new(1.0);
        surface.set_backing_size(width, height);
        surface
    }

    #[test]
    fn test_fill_rect_applies_transform() {
        let mut surface = surface(8, 8);
        surface.set_transform(2.0, 2.0);
        surface.fill_rect(1.0, 1.0, 2.0, 1.0, RED);

        let red = pack_argb(RED);
        assert_eq!(surface.pixel(2, 2), Some(red));
        assert_eq!(surface.pixel(5, 3), Some(red));
        assert_eq!(surface.pixel(6, 2), Some(0));
        assert_eq!(surface.pixel(2, 4), Some(0));
        assert_eq!(surface.pixels().iter().filter(|&&p| p == red).count(), 8);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut surface = surface(4, 4);
        surface.fill_rect(-10.0, 2.0, 100.0, 100.0, RED);
        let red = pack_argb(RED);
        assert_eq!(surface.pixels().iter().filter(|&&p| p == red).count(), 8);
    }

    #[test]
    fn test_degenerate_rects_draw_nothing() {
        let mut surface = surface(4, 4);
        surface.fill_rect(1.0, 1.0, 0.0, 2.0, RED);
        surface.fill_rect(1.0, 1.0, 2.0, f32::NAN, RED);
        assert!(surface.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_clear_ignores_transform() {
        let mut surface = surface(3, 2);
        surface.set_transform(0.5, 0.5);
        surface.clear(Color::WHITE);
        assert!(surface.pixels().iter().all(|&p| p == 0xFFFF_FFFF));
    }

    #[test]
    fn test_resize_resets_context_state() {
        let mut surface = surface(2, 2);
        surface.set_transform(3.0, 3.0);
        surface.set_image_smoothing(false);
        surface.set_backing_size(4, 4);
        assert_eq!(surface.transform(), (1.0, 1.0));
        assert!(surface.image_smoothing());
        assert_eq!(surface.pixels().len(), 16);
    }

    #[test]
    fn test_oversized_backing_store_has_no_context() {
        let mut surface = PixelBuffer::new(1.0);
        surface.set_backing_size(20_000, 20_000);
        assert!(surface.pixels().is_empty());
        assert!(surface.context().is_err());
    }

    #[test]
    fn test_to_rgb_image() {
        let mut surface = surface(2, 1);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, RED);

        let image = surface.to_rgb_image();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_save_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waveform.png");

        let mut surface = surface(3, 2);
        surface.clear(Color::from_rgb8(0x11, 0x11, 0x14));
        surface.fill_rect(1.0, 0.0, 1.0, 2.0, RED);
        surface.save_image(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded, surface.to_rgb_image());
        assert_eq!(loaded.get_pixel(1, 1), &Rgb([255, 0, 0]));
        assert_eq!(loaded.get_pixel(0, 0), &Rgb([0x11, 0x11, 0x14]));
    }
}
