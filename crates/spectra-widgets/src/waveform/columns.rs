//! Per-pixel column layout
//!
//! Maps every output column back onto the envelope, interpolates amplitude
//! and band energies between the neighbouring positions and splits the
//! amplitude into stacked low/mid/high heights.

use spectra_core::{quantize_amplitude, SpectralTriple, FREQUENCY_QUANTIZATION_LEVELS};

/// Smallest share a band gets after per-band normalization, so quiet bands
/// still show a sliver of color
pub const MIN_BAND_SHARE: f32 = 0.1;

/// One output column, in render-space pixels
///
/// Lives for a single render: built here, shaved once by
/// [`smooth_peaks`](super::smoothing::smooth_peaks), then drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Column {
    /// Left edge in render coordinates
    pub x: f32,
    /// Interpolated normalized amplitude before the band split
    pub amplitude: f32,
    pub low_amplitude: f32,
    pub mid_amplitude: f32,
    pub high_amplitude: f32,
    /// `low + mid + high`
    pub total_amplitude: f32,
}

impl Column {
    /// Scale every amplitude by `factor`, keeping the band mix
    pub fn scale(&mut self, factor: f32) {
        self.amplitude *= factor;
        self.low_amplitude *= factor;
        self.mid_amplitude *= factor;
        self.high_amplitude *= factor;
        self.total_amplitude *= factor;
    }
}

/// Columns plus the shared bar width
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    pub columns: Vec<Column>,
    /// Width of every bar in render pixels (at least 1)
    pub rect_width: f32,
}

/// Per-band maxima across a track
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandMaxima {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

impl BandMaxima {
    /// Single pass over all positions
    pub fn from_spectral(spectral: &[SpectralTriple]) -> Self {
        spectral.iter().fold(Self::default(), |acc, t| Self {
            low: acc.low.max(t.low_energy),
            mid: acc.mid.max(t.mid_energy),
            high: acc.high.max(t.high_energy),
        })
    }

    /// Quantized low/mid/high ratios for one (interpolated) energy triple
    ///
    /// Each band is first scaled by its track maximum with a
    /// [`MIN_BAND_SHARE`] floor, then the shares are normalized to sum to one
    /// (equal thirds if they sum to zero) and quantized to
    /// [`FREQUENCY_QUANTIZATION_LEVELS`] levels.
    pub fn band_ratios(&self, energy: &SpectralTriple) -> [f32; 3] {
        let low = band_share(energy.low_energy, self.low);
        let mid = band_share(energy.mid_energy, self.mid);
        let high = band_share(energy.high_energy, self.high);
        let total = low + mid + high;

        let ratios = if total > 0.0 {
            [low / total, mid / total, high / total]
        } else {
            [1.0 / 3.0; 3]
        };

        ratios.map(|ratio| quantize_amplitude(ratio, FREQUENCY_QUANTIZATION_LEVELS))
    }
}

#[inline]
fn band_share(energy: f32, max_energy: f32) -> f32 {
    let share = if max_energy > 0.0 {
        energy / max_energy
    } else {
        0.0
    };
    share.max(MIN_BAND_SHARE)
}

/// Lay out columns across `render_width` pixels
///
/// `amplitudes` are normalized pixel heights, one per envelope position, and
/// `spectral` holds the matching band energies. Bars are
/// `max(1, floor(render_width / N))` pixels wide. Returns an empty layout for
/// empty data or a non-positive width.
pub fn build_columns(
    amplitudes: &[f32],
    spectral: &[SpectralTriple],
    render_width: f32,
) -> ColumnLayout {
    let positions = amplitudes.len().min(spectral.len());
    if positions == 0 || !(render_width > 0.0) {
        return ColumnLayout::default();
    }

    let step = render_width / positions as f32;
    let rect_width = step.floor().max(1.0);
    let maxima = BandMaxima::from_spectral(&spectral[..positions]);
    let last = positions - 1;

    let column_count = (render_width / rect_width).ceil() as usize;
    let mut columns = Vec::with_capacity(column_count);

    for i in 0..column_count {
        let x = i as f32 * rect_width;
        let data_index = x / step;
        let lower = (data_index.floor() as usize).min(last);
        let upper = (data_index.ceil() as usize).min(last);
        let t = (data_index - lower as f32).clamp(0.0, 1.0);

        let amplitude = amplitudes[lower] + (amplitudes[upper] - amplitudes[lower]) * t;
        let energy = spectral[lower].lerp(&spectral[upper], t);
        let [low_ratio, mid_ratio, high_ratio] = maxima.band_ratios(&energy);

        let low_amplitude = amplitude * low_ratio;
        let mid_amplitude = amplitude * mid_ratio;
        let high_amplitude = amplitude * high_ratio;

        columns.push(Column {
            x,
            amplitude,
            low_amplitude,
            mid_amplitude,
            high_amplitude,
            total_amplitude: low_amplitude + mid_amplitude + high_amplitude,
        });
    }

    ColumnLayout {
        columns,
        rect_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize, energy: SpectralTriple) -> Vec<SpectralTriple> {
        vec![energy; n]
    }

    #[test]
    fn test_one_column_per_pixel_when_data_is_sparse() {
        let layout = build_columns(&[10.0; 4], &flat(4, SpectralTriple::new(1.0, 1.0, 1.0)), 100.0);
        // step 25 -> 25px bars, 4 columns
        assert_eq!(layout.rect_width, 25.0);
        assert_eq!(layout.columns.len(), 4);
        assert_eq!(layout.columns[3].x, 75.0);
    }

    #[test]
    fn test_dense_data_uses_one_pixel_bars() {
        let layout = build_columns(&[10.0; 600], &flat(600, SpectralTriple::ZERO), 300.0);
        assert_eq!(layout.rect_width, 1.0);
        assert_eq!(layout.columns.len(), 300);
    }

    #[test]
    fn test_amplitude_is_interpolated() {
        let layout = build_columns(&[0.0, 40.0], &flat(2, SpectralTriple::ZERO), 4.0);
        // step 2, rect 2: x = 0 -> index 0, x = 2 -> index 1
        assert_eq!(layout.columns[0].amplitude, 0.0);
        assert_eq!(layout.columns[1].amplitude, 40.0);

        let layout = build_columns(&[0.0, 40.0], &flat(2, SpectralTriple::ZERO), 2.5);
        // step 1.25, rect 1: x = 1 -> index 0.8
        assert!((layout.columns[1].amplitude - 32.0).abs() < 1e-4);
    }

    #[test]
    fn test_equal_energies_split_evenly() {
        let layout = build_columns(&[32.0], &flat(1, SpectralTriple::new(2.0, 2.0, 2.0)), 1.0);
        let column = layout.columns[0];
        // 1/3 quantized to sixteenths = 5/16
        assert_eq!(column.low_amplitude, 10.0);
        assert_eq!(column.mid_amplitude, 10.0);
        assert_eq!(column.high_amplitude, 10.0);
        assert_eq!(column.total_amplitude, 30.0);
    }

    #[test]
    fn test_silent_bands_keep_minimum_share() {
        let maxima = BandMaxima {
            low: 10.0,
            mid: 10.0,
            high: 10.0,
        };
        let ratios = maxima.band_ratios(&SpectralTriple::new(10.0, 0.0, 0.0));
        // shares 1.0, 0.1, 0.1 -> 0.833, 0.083, 0.083
        assert_eq!(ratios, [13.0 / 16.0, 1.0 / 16.0, 1.0 / 16.0]);
    }

    #[test]
    fn test_zero_maxima_fall_back_to_floor() {
        let ratios = BandMaxima::default().band_ratios(&SpectralTriple::ZERO);
        assert_eq!(ratios, [5.0 / 16.0; 3]);
    }

    #[test]
    fn test_band_maxima_single_pass() {
        let maxima = BandMaxima::from_spectral(&[
            SpectralTriple::new(1.0, 5.0, 0.0),
            SpectralTriple::new(3.0, 2.0, 7.0),
        ]);
        assert_eq!(
            maxima,
            BandMaxima {
                low: 3.0,
                mid: 5.0,
                high: 7.0
            }
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(build_columns(&[], &[], 100.0).columns.is_empty());
        assert!(build_columns(&[1.0], &flat(1, SpectralTriple::ZERO), 0.0).columns.is_empty());
        assert!(build_columns(&[1.0], &flat(1, SpectralTriple::ZERO), f32::NAN).columns.is_empty());
    }

    #[test]
    fn test_scale_keeps_mix() {
        let mut column = Column {
            x: 0.0,
            amplitude: 20.0,
            low_amplitude: 10.0,
            mid_amplitude: 6.0,
            high_amplitude: 4.0,
            total_amplitude: 20.0,
        };
        column.scale(0.5);
        assert_eq!(column.low_amplitude, 5.0);
        assert_eq!(column.mid_amplitude, 3.0);
        assert_eq!(column.high_amplitude, 2.0);
        assert_eq!(column.total_amplitude, 10.0);
        assert_eq!(column.amplitude, 10.0);
    }
}
