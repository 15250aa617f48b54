//! Settings for offline rendering

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use spectra_core::config::{default_cache_dir, AnalysisConfig};
use spectra_core::NormalizationConfig;

use crate::theme::PaletteColors;

/// Everything `spectra-render` reads from its YAML file
///
/// ```yaml
/// width: 1200
/// height: 96
/// device_pixel_ratio: 2.0
/// normalization:
///   constraints:
///     - { percentile: 0.5, target: 1.0 }
/// palette:
///   mid_frequency: "#33CC66"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub analysis: AnalysisConfig,
    pub normalization: NormalizationConfig,
    pub palette: PaletteColors,
    /// Logical output width
    /// Default: 1200
    pub width: f32,
    /// Logical output height
    /// Default: 96
    pub height: f32,
    /// Device pixels per logical pixel
    /// Default: 1.0
    pub device_pixel_ratio: f32,
    /// Render-data cache, `None` for the platform cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            normalization: NormalizationConfig::default(),
            palette: PaletteColors::default(),
            width: 1200.0,
            height: 96.0,
            device_pixel_ratio: 1.0,
            cache_dir: None,
        }
    }
}

impl RenderSettings {
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }
}
