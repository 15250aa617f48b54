//! Application-owned state for the spectral waveform widget

use spectra_core::{NormalizationConfig, WaveformRenderData};

use crate::theme::ColorPalette;

/// Widget height in logical pixels
/// 54px = 1080/20, scales to 108px on UHD (2160p)
pub const WAVEFORM_HEIGHT: f32 = 54.0;

/// Everything the widget needs to draw one track
///
/// `data` is `None` until analysis finishes; the widget then shows only the
/// placeholder line. Render data is resolution-stable, so resizes never
/// require touching this state.
#[derive(Debug, Clone, Default)]
pub struct SpectralWaveformState {
    pub data: Option<WaveformRenderData>,
    pub palette: ColorPalette,
    pub normalization: NormalizationConfig,
}

impl SpectralWaveformState {
    pub fn new(palette: ColorPalette, normalization: NormalizationConfig) -> Self {
        Self {
            data: None,
            palette,
            normalization,
        }
    }

    /// Attach analyzed data (e.g. when a background analysis completes)
    pub fn set_data(&mut self, data: WaveformRenderData) {
        self.data = Some(data);
    }

    /// Drop data when the track is unloaded
    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}
