//! Standard locations for spectra configuration and caches

use std::path::PathBuf;

/// Application directory name used under the platform config/cache roots
const APP_DIR: &str = "spectra";

/// Config directory
///
/// Returns `~/.config/spectra` on Linux, falling back to `~/spectra` and
/// finally `./spectra` when no home directory is known.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Path of a named config file inside [`default_config_dir`]
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

/// Render-data cache directory (`~/.cache/spectra/waveforms` on Linux)
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("waveforms")
}
