//! Configuration for spectra analysis and rendering
//!
//! - Generic YAML loading/saving for any serde config type
//! - Standard config and cache locations
//! - Analysis resolution settings
//!
//! Normalization tuning lives in [`crate::normalize::NormalizationConfig`] and
//! is re-exported here so app configs can embed it.
//!
//! # Usage
//!
//! ```ignore
//! use spectra_core::config::{load_config, save_config, default_config_path};
//!
//! let path = default_config_path("render.yaml");
//! let settings: MySettings = load_config(&path);
//! save_config(&settings, &path)?;
//! ```

mod analysis;
mod io;
mod paths;

pub use analysis::AnalysisConfig;
pub use io::{load_config, parse_config, save_config};
pub use paths::{default_cache_dir, default_config_dir, default_config_path};

pub use crate::normalize::{NormalizationConfig, NormalizationConstraint};
