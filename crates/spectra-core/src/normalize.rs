//! Percentile-driven amplitude normalization and level quantization
//!
//! The display scale is chosen so that every configured constraint
//! "at least `percentile` of the positions reach `target` of the full height"
//! holds at once. Each constraint proposes a divisor; the smallest one wins.

use serde::{Deserialize, Serialize};

use crate::types::WAVEFORM_QUANTIZATION_LEVELS;

/// One minimum-threshold constraint
///
/// Both values are fractions and are clamped into [0, 1] before use, so
/// hand-edited configs never fail normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConstraint {
    /// Position in the sorted envelope (0.5 = median)
    pub percentile: f32,
    /// Fraction of full height that percentile must reach
    pub target: f32,
}

impl NormalizationConstraint {
    pub const fn new(percentile: f32, target: f32) -> Self {
        Self { percentile, target }
    }

    /// Copy with both fields clamped into [0, 1] (NaN becomes 0)
    pub fn clamped(&self) -> Self {
        Self {
            percentile: clamp_unit(self.percentile),
            target: clamp_unit(self.target),
        }
    }
}

/// Ordered list of normalization constraints
///
/// An empty list behaves like the default single `(0.5, 1.0)` constraint:
/// the median position is drawn at full height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    pub constraints: Vec<NormalizationConstraint>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            constraints: vec![Self::DEFAULT_CONSTRAINT],
        }
    }
}

impl NormalizationConfig {
    /// Median reaches full height
    pub const DEFAULT_CONSTRAINT: NormalizationConstraint = NormalizationConstraint::new(0.5, 1.0);

    pub fn new(constraints: Vec<NormalizationConstraint>) -> Self {
        Self { constraints }
    }

    /// Build from `(percentile, target)` pairs
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Self {
        Self {
            constraints: pairs
                .iter()
                .map(|&(percentile, target)| NormalizationConstraint::new(percentile, target))
                .collect(),
        }
    }

    /// Clamped constraints, falling back to the default when the list is empty
    pub fn effective_constraints(&self) -> Vec<NormalizationConstraint> {
        if self.constraints.is_empty() {
            return vec![Self::DEFAULT_CONSTRAINT];
        }
        self.constraints.iter().map(NormalizationConstraint::clamped).collect()
    }
}

/// Quantize a fraction into `levels` equal buckets
///
/// Returns `floor(clamp(fraction, 0, 1) * levels) / levels`. Inputs in [0, 1)
/// map onto exactly `levels` distinct values; 1.0 (and above) maps to 1.0.
/// `levels == 0` always yields 0.
///
/// # Example
///
/// ```
/// use spectra_core::normalize::quantize_amplitude;
///
/// assert_eq!(quantize_amplitude(0.999, 8), 7.0 / 8.0);
/// assert_eq!(quantize_amplitude(-3.0, 8), 0.0);
/// ```
#[inline]
pub fn quantize_amplitude(fraction: f32, levels: u32) -> f32 {
    if levels == 0 {
        return 0.0;
    }
    let levels = levels as f32;
    (clamp_unit(fraction) * levels).floor() / levels
}

/// Divisor that satisfies every constraint at once
///
/// Starts at the envelope maximum and is lowered to the smallest candidate
/// `sorted[floor(N * percentile)] / target` over all constraints. Constraints
/// whose percentile value or target is zero propose nothing. Returns `None`
/// for an empty or all-zero envelope.
pub fn effective_max(waveform_data: &[f32], config: &NormalizationConfig) -> Option<f32> {
    let max_waveform = waveform_data.iter().copied().fold(0.0f32, f32::max);
    if waveform_data.is_empty() || max_waveform <= 0.0 {
        return None;
    }

    let mut sorted = waveform_data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let len = sorted.len();
    let mut effective = max_waveform;
    for constraint in config.effective_constraints() {
        let index = (len as f32 * constraint.percentile).floor() as usize;
        let percentile_value = sorted.get(index).copied().unwrap_or(0.0);
        if percentile_value > 0.0 && constraint.target > 0.0 {
            effective = effective.min(percentile_value / constraint.target);
        }
    }

    Some(effective)
}

/// Scale an envelope to pixel heights in `[0, max_amplitude_pixels]`
///
/// Each value becomes `min(value / effective_max * max_amplitude_pixels,
/// max_amplitude_pixels)`, then is quantized to
/// [`WAVEFORM_QUANTIZATION_LEVELS`] levels of the full height. Degenerate input
/// (empty, all-zero, or a non-positive height) yields zeros.
pub fn normalize(
    waveform_data: &[f32],
    max_amplitude_pixels: f32,
    config: &NormalizationConfig,
) -> Vec<f32> {
    let effective = match effective_max(waveform_data, config) {
        Some(effective) if max_amplitude_pixels > 0.0 => effective,
        _ => return vec![0.0; waveform_data.len()],
    };

    log::debug!(
        "normalize: {} positions, effective max {:.6}, height {:.1}px",
        waveform_data.len(),
        effective,
        max_amplitude_pixels
    );

    waveform_data
        .iter()
        .map(|&value| {
            let pixels = (value / effective * max_amplitude_pixels).min(max_amplitude_pixels);
            quantize_amplitude(pixels / max_amplitude_pixels, WAVEFORM_QUANTIZATION_LEVELS)
                * max_amplitude_pixels
        })
        .collect()
}

#[inline]
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_levels() {
        assert_eq!(quantize_amplitude(0.0, 8), 0.0);
        assert_eq!(quantize_amplitude(0.999, 8), 7.0 / 8.0);
        assert_eq!(quantize_amplitude(0.125, 8), 0.125);
        assert_eq!(quantize_amplitude(0.124, 8), 0.0);
        assert_eq!(quantize_amplitude(1.5, 8), 1.0);
        assert_eq!(quantize_amplitude(f32::NAN, 8), 0.0);
        assert_eq!(quantize_amplitude(0.7, 0), 0.0);
    }

    #[test]
    fn test_quantize_is_monotonic_with_exact_level_count() {
        let mut previous = 0.0;
        let mut distinct = Vec::new();
        for i in 0..1000 {
            let q = quantize_amplitude(i as f32 / 1000.0, 16);
            assert!(q >= previous);
            if distinct.last() != Some(&q) {
                distinct.push(q);
            }
            previous = q;
        }
        assert_eq!(distinct.len(), 16);
    }

    #[test]
    fn test_median_constraint_fills_half() {
        let waveform: Vec<f32> = (1..=101).map(|i| i as f32 / 101.0).collect();
        let heights = normalize(&waveform, 80.0, &NormalizationConfig::default());

        let full = heights.iter().filter(|&&h| h == 80.0).count();
        assert!(full * 2 >= waveform.len(), "only {} of {} at full height", full, waveform.len());
        assert!(heights.iter().all(|&h| (0.0..=80.0).contains(&h)));
    }

    fn full_height_count(heights: &[f32], max_pixels: f32) -> usize {
        heights.iter().filter(|&&h| h == max_pixels).count()
    }

    #[test]
    fn test_median_constraint_with_even_length() {
        let waveform = [0.8, 0.1, 0.6, 0.3, 0.2, 0.7, 0.4, 0.5];
        let heights = normalize(&waveform, 40.0, &NormalizationConfig::default());
        // sorted[4] = 0.5 -> 0.5, 0.6, 0.7, 0.8 reach full height
        assert_eq!(full_height_count(&heights, 40.0), 4);
        // 0.1 / 0.5 = 0.2 of full height -> one eighth
        assert_eq!(heights[1], 5.0);
    }

    #[test]
    fn test_median_constraint_with_duplicates() {
        let waveform = [0.2, 0.5, 0.5, 0.5, 0.5, 0.5, 0.9];
        let heights = normalize(&waveform, 64.0, &NormalizationConfig::default());
        // Every duplicate of the median is at full height
        assert_eq!(full_height_count(&heights, 64.0), 6);
        assert!(full_height_count(&heights, 64.0) * 2 >= waveform.len());
    }

    #[test]
    fn test_single_nonzero_value_is_full_height() {
        let waveform = [0.0, 0.0, 0.0, 0.0, 0.7];
        let heights = normalize(&waveform, 32.0, &NormalizationConfig::default());
        // The median is 0, so the envelope max is the divisor
        assert_eq!(heights, vec![0.0, 0.0, 0.0, 0.0, 32.0]);
    }

    #[test]
    fn test_most_restrictive_constraint_wins() {
        // Skewed: mostly quiet, a few loud positions
        let mut waveform = vec![0.1f32; 90];
        waveform.extend(vec![0.8f32; 10]);

        let config = NormalizationConfig::from_pairs(&[(0.5, 1.0), (0.9, 0.5)]);
        let effective = effective_max(&waveform, &config).unwrap();

        // candidates: sorted[50] / 1.0 = 0.1, sorted[90] / 0.5 = 1.6
        let candidate_a = 0.1 / 1.0;
        let candidate_b = 0.8 / 0.5;
        assert_eq!(effective, f32::min(candidate_a, candidate_b));
        assert_eq!(effective, 0.1);
    }

    #[test]
    fn test_constraints_never_raise_above_max() {
        let waveform = vec![0.2, 0.4, 0.6];
        let config = NormalizationConfig::from_pairs(&[(0.0, 0.01)]);
        // 0.2 / 0.01 = 20 > max, so the max stays
        assert_eq!(effective_max(&waveform, &config), Some(0.6));
    }

    #[test]
    fn test_out_of_range_constraints_are_clamped() {
        let waveform = vec![0.1, 0.2, 0.3, 0.4];
        let config = NormalizationConfig::from_pairs(&[(7.0, -2.0), (-1.0, 5.0)]);
        // (1.0, 0.0): index 4 is out of bounds and target 0 -> ignored
        // (0.0, 1.0): sorted[0] = 0.1
        assert_eq!(effective_max(&waveform, &config), Some(0.1));
    }

    #[test]
    fn test_empty_constraints_use_default() {
        let waveform = vec![0.1, 0.2, 0.3, 0.4];
        let empty = NormalizationConfig::new(Vec::new());
        assert_eq!(
            effective_max(&waveform, &empty),
            effective_max(&waveform, &NormalizationConfig::default())
        );
    }

    #[test]
    fn test_degenerate_inputs_yield_zero() {
        let config = NormalizationConfig::default();
        assert!(normalize(&[], 100.0, &config).is_empty());
        assert_eq!(normalize(&[0.0, 0.0, 0.0], 100.0, &config), vec![0.0; 3]);
        assert_eq!(normalize(&[0.5, 1.0], 0.0, &config), vec![0.0; 2]);
        assert_eq!(effective_max(&[0.0; 4], &config), None);
    }

    #[test]
    fn test_output_is_quantized_to_eighths() {
        let waveform: Vec<f32> = (0..50).map(|i| (i as f32 * 0.37).sin().abs()).collect();
        let heights = normalize(&waveform, 64.0, &NormalizationConfig::default());
        for h in heights {
            // 64 / 8 = 8px steps
            assert_eq!(h % 8.0, 0.0);
        }
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "constraints:\n  - percentile: 0.5\n    target: 1.0\n  - percentile: 0.9\n    target: 0.5\n";
        let config: NormalizationConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config, NormalizationConfig::from_pairs(&[(0.5, 1.0), (0.9, 0.5)]));

        let config: NormalizationConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, NormalizationConfig::default());
    }
}
