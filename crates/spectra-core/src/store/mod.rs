//! Keyed storage for precomputed render data
//!
//! Analysis results only depend on the audio and the requested resolution, so
//! they are cached by a stable key derived from the audio URL. The analysis
//! code never touches storage itself; callers pick a backend:
//!
//! - [`MemoryStore`]: in-process map, shared between threads
//! - [`FileStore`]: one JSON file per key in a cache directory
//!
//! # Usage
//!
//! ```ignore
//! let store = FileStore::new(cache_dir)?;
//! let data = load_or_analyze(&store, "file:///music/track.wav", 600, || decode(path))?;
//! ```

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::analysis::analyze_track;
use crate::types::{PcmBuffer, WaveformRenderData, MAX_TARGET_COUNT};

/// Prefix shared by every render-data key
pub const CACHE_KEY_PREFIX: &str = "waveform-";

/// Hex characters of the URL digest kept in a key
const CACHE_KEY_HASH_LEN: usize = 32;

/// Errors that can occur while persisting render data
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure
    #[error("Store I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failure
    #[error("Failed to serialize render data for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Keys must be usable as file names
    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend for [`WaveformRenderData`]
pub trait RenderDataStore: Send + Sync {
    /// Cached data for `key`, or `None` on a miss (including unreadable entries)
    fn get(&self, key: &str) -> Option<WaveformRenderData>;

    /// Store `data` under `key`, replacing any previous entry
    fn set(&self, key: &str, data: &WaveformRenderData) -> StoreResult<()>;
}

/// Stable store key for an audio URL
///
/// # Example
///
/// ```
/// use spectra_core::store::cache_key;
///
/// let key = cache_key("https://example.com/track.mp3");
/// assert!(key.starts_with("waveform-"));
/// assert_eq!(key, cache_key("https://example.com/track.mp3"));
/// ```
pub fn cache_key(audio_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(audio_url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}{}", CACHE_KEY_PREFIX, &digest[..CACHE_KEY_HASH_LEN])
}

/// Cached render data for `audio_url`, analyzing on a miss
///
/// A cached entry is only reused when its length matches the (clamped)
/// requested `target_count`. On a miss `decode` is called to obtain PCM, the
/// track is analyzed and the result stored. Store failures are logged and do
/// not fail the call; decode failures are returned unchanged.
pub fn load_or_analyze<S, F, E>(
    store: &S,
    audio_url: &str,
    target_count: usize,
    decode: F,
) -> Result<WaveformRenderData, E>
where
    S: RenderDataStore + ?Sized,
    F: FnOnce() -> Result<PcmBuffer, E>,
{
    let target_count = target_count.min(MAX_TARGET_COUNT);
    let key = cache_key(audio_url);

    if let Some(cached) = store.get(&key) {
        if cached.len() == target_count {
            log::debug!("load_or_analyze: Cache hit for {} ({})", audio_url, key);
            return Ok(cached);
        }
        log::info!(
            "load_or_analyze: Cached entry for {} has {} positions, {} requested; re-analyzing",
            audio_url,
            cached.len(),
            target_count
        );
    }

    let pcm = decode()?;
    let data = analyze_track(&pcm, target_count);

    if let Err(e) = store.set(&key, &data) {
        log::warn!("load_or_analyze: Failed to cache render data for {}: {}", audio_url, e);
    }

    Ok(data)
}

/// Keys become file names, so restrict them to a portable character set
pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_cache_key_is_stable_and_distinct() {
        let a = cache_key("file:///music/a.wav");
        let b = cache_key("file:///music/b.wav");
        assert_eq!(a, cache_key("file:///music/a.wav"));
        assert_ne!(a, b);
        assert_eq!(a.len(), CACHE_KEY_PREFIX.len() + CACHE_KEY_HASH_LEN);
        assert!(validate_key(&a).is_ok());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("waveform-abc_123").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
    }

    #[test]
    fn test_load_or_analyze_decodes_once() {
        let store = MemoryStore::new();
        let decodes = Cell::new(0);
        let decode = || -> Result<PcmBuffer, String> {
            decodes.set(decodes.get() + 1);
            Ok(PcmBuffer::mono(vec![0.4; 12_000], 48_000))
        };

        let first = load_or_analyze(&store, "track", 12, decode).unwrap();
        let second = load_or_analyze(&store, "track", 12, decode).unwrap();

        assert_eq!(decodes.get(), 1);
        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
    }

    #[test]
    fn test_load_or_analyze_reanalyzes_on_resolution_change() {
        let store = MemoryStore::new();
        let decodes = Cell::new(0);
        let decode = || -> Result<PcmBuffer, String> {
            decodes.set(decodes.get() + 1);
            Ok(PcmBuffer::mono(vec![0.4; 12_000], 48_000))
        };

        load_or_analyze(&store, "track", 12, decode).unwrap();
        let data = load_or_analyze(&store, "track", 24, decode).unwrap();

        assert_eq!(decodes.get(), 2);
        assert_eq!(data.len(), 24);
    }

    #[test]
    fn test_load_or_analyze_propagates_decode_error() {
        let store = MemoryStore::new();
        let result = load_or_analyze(&store, "broken", 12, || -> Result<PcmBuffer, String> {
            Err("decode failed".to_string())
        });
        assert_eq!(result, Err("decode failed".to_string()));
        assert!(store.get(&cache_key("broken")).is_none());
    }
}
