//! In-process render-data store

use std::collections::HashMap;
use std::sync::RwLock;

use super::{RenderDataStore, StoreResult};
use crate::types::WaveformRenderData;

/// Thread-safe in-memory store
///
/// Entries live for the lifetime of the store. Useful for tests and for
/// sessions that should not touch the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, WaveformRenderData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl RenderDataStore for MemoryStore {
    fn get(&self, key: &str) -> Option<WaveformRenderData> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, data: &WaveformRenderData) -> StoreResult<()> {
        // A poisoned lock only means another writer panicked; the map is still usable
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key.to_string(), data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let store = MemoryStore::new();
        assert!(store.get("missing").is_none());

        let data = WaveformRenderData::silent(4);
        store.set("key", &data).unwrap();

        assert_eq!(store.get("key"), Some(data));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_replaces() {
        let store = MemoryStore::new();
        store.set("key", &WaveformRenderData::silent(4)).unwrap();
        store.set("key", &WaveformRenderData::silent(8)).unwrap();
        assert_eq!(store.get("key").map(|d| d.len()), Some(8));
    }
}
