//! Spectra Widgets - stacked, frequency-colored waveform rendering
//!
//! Draws [`spectra_core::WaveformRenderData`] as stacked low/mid/high bars
//! onto any raster [`Surface`](surface::Surface): an iced canvas frame in the
//! UI, or an in-memory [`PixelBuffer`](surface::PixelBuffer) for tests and the
//! `spectra-render` tool.
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State struct**: `SpectralWaveformState` holds data, palette and normalization
//! - **View function**: `spectral_waveform` takes state + seek callback, returns `Element<Message>`
//! - **Canvas Program**: renders through the compositor and translates clicks to seeks
//!
//! The compositor itself knows nothing about iced; it only needs the
//! [`Surface`](surface::Surface) capability.

pub mod settings;
pub mod surface;
pub mod theme;
pub mod waveform;
pub mod wav;

pub use settings::RenderSettings;
pub use surface::{setup_surface, DisplaySize, DrawContext, PixelBuffer, Surface, SurfaceError};
pub use theme::{parse_hex_color, ColorPalette, PaletteColors};

pub use waveform::{
    render, render_at_resolution, seek_fraction, smooth_peaks, RenderError,
    SpectralWaveformState, WAVEFORM_HEIGHT,
};

// View function and canvas types
pub use waveform::{spectral_waveform, FrameSurface, SpectralWaveformCanvas, WaveformInteraction};
