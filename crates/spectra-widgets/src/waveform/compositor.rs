//! Stacked-bar compositor
//!
//! Draws [`WaveformRenderData`] onto any [`Surface`]: normalize the envelope
//! to the display height, lay out one column per bar, shave lone peaks, then
//! fill low/mid/high rectangles bottom-up and finish with a baseline bar.
//!
//! The surface must already be prepared with
//! [`setup_surface`](crate::surface::setup_surface). Rendering only depends on
//! the cached data and the current size, so resizes and palette changes just
//! call [`render`] again.

use spectra_core::{
    normalize, quantize_amplitude, NormalizationConfig, WaveformRenderData,
    FREQUENCY_QUANTIZATION_LEVELS,
};
use thiserror::Error;

use super::columns::build_columns;
use super::smoothing::smooth_peaks;
use crate::surface::{DrawContext, Surface, SurfaceError};
use crate::theme::ColorPalette;

/// Internal horizontal render resolution relative to the display width
pub const HORIZONTAL_RESOLUTION_MULTIPLIER: u32 = 1;

/// The baseline bar is `backing_height / CENTER_LINE_DIVISOR` device pixels tall
pub const CENTER_LINE_DIVISOR: f32 = 24.0;

/// Errors raised while rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Render at the default horizontal resolution
pub fn render<S: Surface>(
    surface: &mut S,
    data: &WaveformRenderData,
    palette: &ColorPalette,
    normalization: &NormalizationConfig,
) -> Result<(), RenderError> {
    render_at_resolution(
        surface,
        data,
        palette,
        normalization,
        HORIZONTAL_RESOLUTION_MULTIPLIER,
    )
}

/// Render with columns laid out over `display_width * multiplier` pixels
///
/// The context is inverse-scaled horizontally while drawing bars, so the
/// result always covers the display width. A multiplier of 1 draws bars
/// directly in logical pixels.
pub fn render_at_resolution<S: Surface>(
    surface: &mut S,
    data: &WaveformRenderData,
    palette: &ColorPalette,
    normalization: &NormalizationConfig,
    multiplier: u32,
) -> Result<(), RenderError> {
    let dpr = surface.device_pixel_ratio();
    if !dpr.is_finite() || dpr <= 0.0 {
        return Err(SurfaceError::InvalidPixelRatio(dpr).into());
    }
    let (display_width, display_height) = surface.css_size();
    let (_, backing_height) = surface.backing_size();
    let multiplier = multiplier.max(1) as f32;

    let context = surface.context()?;
    context.set_transform(dpr, dpr);
    context.set_image_smoothing(false);
    context.clear(palette.background);

    if display_width <= 0.0 || display_height <= 0.0 {
        return Ok(());
    }

    let amplitudes = normalize(data.waveform_data(), display_height, normalization);
    let mut layout = build_columns(&amplitudes, data.spectral_data(), display_width * multiplier);
    smooth_peaks(&mut layout.columns);

    log::debug!(
        "render: {} positions -> {} columns ({}px bars) at {}x{} @ {}x",
        data.len(),
        layout.columns.len(),
        layout.rect_width,
        display_width,
        display_height,
        dpr
    );

    context.set_transform(dpr / multiplier, dpr);
    for column in &layout.columns {
        let mut top = display_height;
        for (amplitude, color) in [
            (column.low_amplitude, palette.low_frequency),
            (column.mid_amplitude, palette.mid_frequency),
            (column.high_amplitude, palette.high_frequency),
        ] {
            let height = band_height(amplitude, display_height, dpr);
            if height > 0.0 {
                top -= height;
                context.fill_rect(column.x, top, layout.rect_width, height, color);
            }
        }
    }

    context.set_transform(dpr, dpr);
    let line_height = center_line_height(backing_height, dpr);
    if line_height > 0.0 {
        context.fill_rect(
            0.0,
            display_height - line_height,
            display_width,
            line_height,
            palette.low_frequency,
        );
    }

    Ok(())
}

/// Quantized band height in logical pixels, floored to whole device pixels
fn band_height(amplitude: f32, max_amplitude_pixels: f32, dpr: f32) -> f32 {
    let fraction = quantize_amplitude(amplitude / max_amplitude_pixels, FREQUENCY_QUANTIZATION_LEVELS);
    (fraction * max_amplitude_pixels * dpr).floor() / dpr
}

/// Baseline bar height in logical pixels
pub fn center_line_height(backing_height: u32, dpr: f32) -> f32 {
    (backing_height as f32 / CENTER_LINE_DIVISOR).floor() / dpr
}
