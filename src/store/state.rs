//! Durable parameter store implementation
//!
//! `StateStore` maps `(effect, param)` to an `f64`, backed by REAPER's
//! shared ExtState file. Reads go through an in-memory cache; writes merge
//! into the current file contents so that fields owned by REAPER or other
//! scripts are never clobbered.
//!
//! No error crosses this boundary: `get` degrades to the caller's default
//! and `set` reports a boolean, both with a log record of the underlying
//! condition.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use super::paths;
use crate::extstate::ExtStateDoc;

/// Write-through cache keyed by `(effect, param)`
type Cache = HashMap<(String, String), f64>;

/// Durable parameter store backed by REAPER's ExtState file
///
/// The mutex guards both the cache and the file's read-merge-write window.
/// REAPER edits the same file out-of-band, so every `set` re-reads it
/// before writing; serializing the whole window in-process is what keeps
/// two concurrent bridge writes from clobbering each other's keys.
pub struct StateStore {
    /// Resolved ExtState file path (probed once at construction)
    path: PathBuf,

    /// Cached values, source of truth for reads once warm
    cache: Mutex<Cache>,
}

impl StateStore {
    /// Create a store, probing the platform-conventional ExtState locations
    pub fn new() -> Self {
        Self::with_path(paths::resolve())
    }

    /// Create a store backed by an explicit file path
    pub fn with_path(path: PathBuf) -> Self {
        tracing::info!(path = %path.display(), "StateStore initialized");
        Self {
            path,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a parameter value
    ///
    /// Cached values are returned directly. On a cache miss the whole file
    /// is read and parsed, and a hit is cached for later reads. Absent
    /// keys, unreadable files and unparsable values all yield `default`.
    pub async fn get(&self, effect: &str, param: &str, default: f64) -> f64 {
        let mut cache = self.cache.lock().await;

        let key = (effect.to_string(), param.to_string());
        if let Some(value) = cache.get(&key) {
            return *value;
        }

        let Some(doc) = self.read_document().await else {
            return default;
        };

        match doc.get(effect, param) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) => {
                    cache.insert(key, value);
                    value
                }
                Err(_) => {
                    tracing::warn!(effect, param, raw, "Unparsable ExtState value");
                    default
                }
            },
            None => default,
        }
    }

    /// Write a parameter value durably
    ///
    /// Re-reads the backing file, merges the new field in, and rewrites the
    /// file in full — the read-merge-write window is serialized against
    /// other `set` and `get` calls on this store. Returns `false` on any
    /// I/O failure.
    pub async fn set(&self, effect: &str, param: &str, value: f64) -> bool {
        let mut cache = self.cache.lock().await;

        let mut doc = self.read_document().await.unwrap_or_default();
        doc.set(effect, param, value.to_string());

        if !self.ensure_parent_dir().await {
            return false;
        }

        match tokio::fs::write(&self.path, doc.to_string()).await {
            Ok(()) => {
                cache.insert((effect.to_string(), param.to_string()), value);
                tracing::debug!(effect, param, value, "Parameter persisted");
                true
            }
            Err(e) => {
                tracing::error!(effect, param, error = %e, "Failed to write ExtState file");
                false
            }
        }
    }

    /// Liveness signal: the backing file exists (or can be created) and is
    /// writable
    ///
    /// This is a health indicator, not a correctness guarantee — REAPER may
    /// still be absent even when its state file is writable.
    pub async fn connected(&self) -> bool {
        if !self.ensure_parent_dir().await {
            return false;
        }

        match tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "ExtState liveness check failed");
                false
            }
        }
    }

    /// Read and parse the backing file, `None` when absent or unreadable
    async fn read_document(&self) -> Option<ExtStateDoc> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Some(ExtStateDoc::parse(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read ExtState file");
                None
            }
        }
    }

    async fn ensure_parent_dir(&self) -> bool {
        let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return true;
        };

        match tokio::fs::create_dir_all(parent).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(path = %parent.display(), error = %e, "Failed to create ExtState directory");
                false
            }
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn temp_store() -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::with_path(dir.path().join("reaper-extstate.ini"));
        (dir, store)
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (_dir, store) = temp_store();

        assert!(store.set("EQ1", "gain", 3.5).await);
        assert_eq!(store.get("EQ1", "gain", 0.0).await, 3.5);
    }

    #[tokio::test]
    async fn test_get_absent_returns_default() {
        let (_dir, store) = temp_store();

        assert_eq!(store.get("EQ1", "gain", -6.0).await, -6.0);

        store.set("EQ1", "gain", 1.0).await;
        assert_eq!(store.get("EQ1", "freq", 440.0).await, 440.0);
    }

    #[tokio::test]
    async fn test_set_is_visible_to_fresh_reader() {
        // Durability: a store with a cold cache must see the value on disk
        let (dir, store) = temp_store();

        assert!(store.set("EQ1", "gain", 3.5).await);

        let fresh = StateStore::with_path(dir.path().join("reaper-extstate.ini"));
        assert_eq!(fresh.get("EQ1", "gain", 0.0).await, 3.5);
    }

    #[tokio::test]
    async fn test_scope_isolation() {
        let (_dir, store) = temp_store();

        assert!(store.set("EQ1", "gain", 1.0).await);
        assert!(store.set("EQ2", "gain", 2.0).await);

        assert_eq!(store.get("EQ1", "gain", 0.0).await, 1.0);
        assert_eq!(store.get("EQ2", "gain", 0.0).await, 2.0);
    }

    #[tokio::test]
    async fn test_set_merges_external_edits() {
        // REAPER writes the same file out-of-band; a bridge write in between
        // must not drop its fields
        let (dir, store) = temp_store();
        let path = dir.path().join("reaper-extstate.ini");

        assert!(store.set("EQ1", "gain", 1.0).await);

        let mut doc = crate::extstate::ExtStateDoc::parse(&std::fs::read_to_string(&path).unwrap());
        doc.set("EQ1", "mix", "0.25");
        doc.set("SWS", "last_project", "/tmp/mix.rpp");
        std::fs::write(&path, doc.to_string()).unwrap();

        assert!(store.set("EQ1", "gain", 2.0).await);

        let fresh = StateStore::with_path(path);
        assert_eq!(fresh.get("EQ1", "gain", 0.0).await, 2.0);
        assert_eq!(fresh.get("EQ1", "mix", 0.0).await, 0.25);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sets_lose_no_updates() {
        // Two writers racing on sibling keys used to be a lost-update hazard;
        // the store's write lock serializes the read-merge-write window
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reaper-extstate.ini");
        let store = Arc::new(StateStore::with_path(path.clone()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                assert!(store.set("Mixer", &format!("ch{}", i), i as f64).await);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let fresh = StateStore::with_path(path);
        for i in 0..8 {
            assert_eq!(fresh.get("Mixer", &format!("ch{}", i), -1.0).await, i as f64);
        }
    }

    #[tokio::test]
    async fn test_unparsable_value_yields_default() {
        let (dir, _) = temp_store();
        let path = dir.path().join("reaper-extstate.ini");
        std::fs::write(&path, "[EQ1]\ngain=not-a-number\n").unwrap();

        let store = StateStore::with_path(path);
        assert_eq!(store.get("EQ1", "gain", 0.5).await, 0.5);
    }

    #[tokio::test]
    async fn test_cache_is_authoritative_once_warm() {
        // Policy: reads do not chase external edits once a value is cached
        let (dir, store) = temp_store();
        let path = dir.path().join("reaper-extstate.ini");

        std::fs::write(&path, "[EQ1]\ngain=1\n").unwrap();
        assert_eq!(store.get("EQ1", "gain", 0.0).await, 1.0);

        std::fs::write(&path, "[EQ1]\ngain=9\n").unwrap();
        assert_eq!(store.get("EQ1", "gain", 0.0).await, 1.0);
    }

    #[tokio::test]
    async fn test_set_fails_on_unwritable_path() {
        // Writing to a directory path must fail cleanly, not panic
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::with_path(dir.path().to_path_buf());

        assert!(!store.set("EQ1", "gain", 1.0).await);
        assert_eq!(store.get("EQ1", "gain", 0.0).await, 0.0);
    }

    #[tokio::test]
    async fn test_connected_creates_missing_file() {
        let (dir, store) = temp_store();

        assert!(store.connected().await);
        assert!(dir.path().join("reaper-extstate.ini").exists());
    }

    #[tokio::test]
    async fn test_precision_survives_round_trip() {
        let (dir, store) = temp_store();
        let value = 0.1 + 0.2; // not representable exactly, must still round-trip

        assert!(store.set("EQ1", "gain", value).await);

        let fresh = StateStore::with_path(dir.path().join("reaper-extstate.ini"));
        assert_eq!(fresh.get("EQ1", "gain", 0.0).await, value);
    }
}
