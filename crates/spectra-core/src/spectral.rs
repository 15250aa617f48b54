//! Cheap three-band energy estimation
//!
//! Approximates low/mid/high frequency content per envelope position without
//! an FFT: within each analysis window, the mean absolute difference between
//! samples a fixed lag apart rises with content at the matching time scale.
//! Long lags respond to coarse (low) motion, short lags to fine (high) motion.
//! The result is scaled by the window RMS.
//!
//! The window cap, lag shifts and stride rules below determine the colour
//! balance of every rendered waveform. Changing any of them changes the
//! output of every palette.

use crate::types::{Sample, SpectralTriple};

/// Upper bound on the analysis window length in samples
pub const MAX_SPECTRAL_WINDOW: usize = 2048;

/// Fixed display scale applied to every band energy
pub const BAND_ENERGY_SCALE: f32 = 100.0;

/// Lag shift (window length >> n) for each band
const LOW_LAG_SHIFT: u32 = 3;
const MID_LAG_SHIFT: u32 = 5;
const HIGH_LAG_SHIFT: u32 = 6;

/// Estimate band energies for every position of `waveform_data`
///
/// Returns exactly one [`SpectralTriple`] per envelope position. Positions whose
/// window is empty (including every position when `pcm` is shorter than the
/// envelope) are all-zero.
pub fn analyze(pcm: &[Sample], waveform_data: &[f32]) -> Vec<SpectralTriple> {
    let positions = waveform_data.len();
    if positions == 0 {
        return Vec::new();
    }

    let samples_per_position = pcm.len() / positions;
    let window_size = MAX_SPECTRAL_WINDOW.min(samples_per_position * 2);

    (0..positions)
        .map(|position| {
            let start = (position * samples_per_position).min(pcm.len());
            let end = (start + window_size).min(pcm.len());
            analyze_window(&pcm[start..end])
        })
        .collect()
}

/// Band energies of a single window
pub fn analyze_window(window: &[Sample]) -> SpectralTriple {
    if window.is_empty() {
        return SpectralTriple::ZERO;
    }

    let rms = rms(window);
    let len = window.len();

    let low_step = (len >> LOW_LAG_SHIFT).max(1);
    let mid_step = (len >> MID_LAG_SHIFT).max(1);
    let high_step = (len >> HIGH_LAG_SHIFT).max(1);

    // Low and mid bands visit every (lag/2)th index; the high band visits all
    let low_variation = lagged_variation(window, low_step, (low_step >> 1).max(1));
    let mid_variation = lagged_variation(window, mid_step, (mid_step >> 1).max(1));
    let high_variation = lagged_variation(window, high_step, 1);

    SpectralTriple {
        low_energy: low_variation * rms * BAND_ENERGY_SCALE,
        mid_energy: mid_variation * rms * BAND_ENERGY_SCALE,
        high_energy: high_variation * rms * BAND_ENERGY_SCALE,
    }
}

/// Root mean square of a window
#[inline]
pub fn rms(window: &[Sample]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = window.iter().map(|s| s * s).sum();
    (sum_squares / window.len() as f32).sqrt()
}

/// Mean of `|w[i] - w[i + lag]|` over `i = 0, stride, 2*stride, ...` while
/// `i + lag` stays inside the window (0 when no pair fits)
#[inline]
fn lagged_variation(window: &[Sample], lag: usize, stride: usize) -> f32 {
    let limit = window.len().saturating_sub(lag);

    let mut sum = 0.0f32;
    let mut count = 0usize;
    for i in (0..limit).step_by(stride) {
        sum += (window[i] - window[i + lag]).abs();
        count += 1;
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}
