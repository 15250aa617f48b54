//! Stacked, frequency-colored waveform
//!
//! Render-time half of the pipeline:
//!
//! - [`columns`] - interpolate the envelope per bar and split it into bands
//! - [`smoothing`] - shave lone peaks
//! - [`compositor`] - draw stacked bars and the baseline onto a surface
//! - [`seek`] - pure click-to-position mapping
//!
//! The iced widget follows the usual state + view function pattern:
//!
//! ```ignore
//! let waveform = spectral_waveform(&self.waveform_state, |pos| Message::Seek(pos));
//! ```

mod canvas;
pub mod columns;
pub mod compositor;
pub mod seek;
pub mod smoothing;
mod state;
mod view;

pub use canvas::{FrameSurface, SpectralWaveformCanvas, WaveformInteraction};
pub use columns::{build_columns, BandMaxima, Column, ColumnLayout, MIN_BAND_SHARE};
pub use compositor::{
    render, render_at_resolution, RenderError, CENTER_LINE_DIVISOR,
    HORIZONTAL_RESOLUTION_MULTIPLIER,
};
pub use seek::seek_fraction;
pub use smoothing::smooth_peaks;
pub use state::{SpectralWaveformState, WAVEFORM_HEIGHT};
pub use view::spectral_waveform;
