//! Raster surface abstraction
//!
//! The compositor only needs four primitives from a drawing target: settable
//! backing pixel dimensions independent of the logical (CSS) size, an axis
//! scale transform, opaque rectangle fills and a switch for image smoothing.
//! [`Surface`] and [`DrawContext`] capture exactly that, so the same pipeline
//! draws into an iced canvas frame or an in-memory [`PixelBuffer`].
//!
//! Coordinates passed to [`DrawContext::fill_rect`] are logical; the context
//! multiplies them by the current transform to reach device pixels.

mod pixel_buffer;

pub use pixel_buffer::{PixelBuffer, MAX_BACKING_PIXELS};

use iced::Color;
use thiserror::Error;

/// Errors raised while preparing or acquiring a surface
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// No 2D context can be obtained (e.g. backing store too large)
    #[error("2D drawing context unavailable: {0}")]
    ContextUnavailable(String),

    /// Device pixel ratio must be finite and positive
    #[error("Invalid device pixel ratio: {0}")]
    InvalidPixelRatio(f32),
}

/// Logical size of a prepared surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub display_width: f32,
    pub display_height: f32,
}

/// Drawing operations on an acquired context
pub trait DrawContext {
    /// Replace the current transform with an axis scale
    fn set_transform(&mut self, scale_x: f32, scale_y: f32);

    /// Current `(scale_x, scale_y)`
    fn transform(&self) -> (f32, f32);

    /// Smoothing must be disabled for crisp bar edges
    fn set_image_smoothing(&mut self, enabled: bool);

    /// Fill the whole backing store, ignoring the transform
    fn clear(&mut self, color: Color);

    /// Fill an opaque rectangle given in logical coordinates
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
}

/// A drawable raster target
pub trait Surface {
    type Context: DrawContext;

    /// Device pixels per logical pixel
    fn device_pixel_ratio(&self) -> f32;

    /// Backing store size in device pixels
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing store (clears its contents)
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Logical (CSS) size
    fn css_size(&self) -> (f32, f32);

    fn set_css_size(&mut self, width: f32, height: f32);

    /// Acquire the 2D drawing context
    fn context(&mut self) -> Result<&mut Self::Context, SurfaceError>;
}

/// Size the backing store for the device pixel ratio
///
/// Backing pixels become `round(css * dpr)` and the context transform is set
/// to `(dpr, dpr)` so later drawing uses logical coordinates. Must be re-run
/// whenever the logical size or the pixel ratio changes.
pub fn setup_surface<S: Surface>(
    surface: &mut S,
    css_width: f32,
    css_height: f32,
) -> Result<DisplaySize, SurfaceError> {
    let dpr = surface.device_pixel_ratio();
    if !dpr.is_finite() || dpr <= 0.0 {
        return Err(SurfaceError::InvalidPixelRatio(dpr));
    }

    let css_width = css_width.max(0.0);
    let css_height = css_height.max(0.0);
    let backing_width = (css_width * dpr).round() as u32;
    let backing_height = (css_height * dpr).round() as u32;

    surface.set_css_size(css_width, css_height);
    surface.set_backing_size(backing_width, backing_height);

    let context = surface.context()?;
    context.set_transform(dpr, dpr);
    context.set_image_smoothing(false);

    log::debug!(
        "setup_surface: {}x{} css @ {}x -> {}x{} backing",
        css_width,
        css_height,
        dpr,
        backing_width,
        backing_height
    );

    Ok(DisplaySize {
        display_width: css_width,
        display_height: css_height,
    })
}
