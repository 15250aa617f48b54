//! JSON-file render-data store
//!
//! Each key is stored as `<dir>/<key>.json` in the `WaveformRenderData` wire
//! shape. Writes go through a temporary file and a rename so a crash never
//! leaves a half-written entry behind.

use std::path::{Path, PathBuf};

use super::{validate_key, RenderDataStore, StoreError, StoreResult};
use crate::types::WaveformRenderData;

/// Directory-backed store
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        log::info!("FileStore: Using cache directory {:?}", dir);
        Ok(Self { dir })
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Remove the entry for `key` (missing entries are not an error)
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

impl RenderDataStore for FileStore {
    fn get(&self, key: &str) -> Option<WaveformRenderData> {
        if validate_key(key).is_err() {
            log::warn!("FileStore::get: Rejecting invalid key {:?}", key);
            return None;
        }

        let path = self.entry_path(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("FileStore::get: Failed to read {:?}: {}", path, e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("FileStore::get: Ignoring corrupt entry {:?}: {}", path, e);
                None
            }
        }
    }

    fn set(&self, key: &str, data: &WaveformRenderData) -> StoreResult<()> {
        validate_key(key)?;

        let json = serde_json::to_string(data).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;

        let path = self.entry_path(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));
        let io_error = |source: std::io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::write(&tmp_path, json).map_err(io_error)?;
        std::fs::rename(&tmp_path, &path).map_err(io_error)?;

        log::debug!("FileStore::set: Wrote {} positions to {:?}", data.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpectralTriple;

    fn sample_data() -> WaveformRenderData {
        WaveformRenderData::new(
            vec![0.0, 0.25, 0.5],
            vec![
                SpectralTriple::ZERO,
                SpectralTriple::new(1.0, 0.5, 0.25),
                SpectralTriple::new(2.0, 1.0, 0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let data = sample_data();

        FileStore::new(dir.path()).unwrap().set("waveform-abc", &data).unwrap();
        let reopened = FileStore::new(dir.path()).unwrap();

        assert_eq!(reopened.get("waveform-abc"), Some(data));
        assert!(!dir.path().join("waveform-abc.json.tmp").exists());
    }

    #[test]
    fn test_missing_and_corrupt_entries_are_misses() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert!(store.get("waveform-missing").is_none());

        std::fs::write(store.entry_path("waveform-bad"), "{not json").unwrap();
        assert!(store.get("waveform-bad").is_none());

        // Valid JSON with mismatched lengths is rejected too
        std::fs::write(
            store.entry_path("waveform-short"),
            r#"{"waveformData":[1.0],"spectralData":[]}"#,
        )
        .unwrap();
        assert!(store.get("waveform-short").is_none());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.set("../outside", &sample_data()),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(store.get("../outside").is_none());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.set("waveform-x", &sample_data()).unwrap();
        store.remove("waveform-x").unwrap();
        assert!(store.get("waveform-x").is_none());
        store.remove("waveform-x").unwrap();
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("cache").join("waveforms");
        let store = FileStore::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }
}
