//! Key-Value Persistence Port
//!
//! String-keyed, string-valued storage the client state lives in.
//! Two adapters:
//! - `MemoryStore`: DashMap-backed, for tests and throwaway sessions
//! - `FileStore`: whole key space kept as one JSON document on disk
//!
//! Readers treat malformed values as absent; writers log and swallow
//! failures. See `read_json` / `write_json`.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};

/// Persistence collaborator
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Shared handle used by every service
pub type SharedStore = Arc<dyn KeyValueStore>;

// ============================================
// MemoryStore
// ============================================

/// In-memory store, thread-safe without explicit locking
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for wiring into services
    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================
// FileStore
// ============================================

/// JSON-document store. Every write rewrites the whole document.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the document at `path`.
    ///
    /// A missing file starts empty. A corrupt file also starts empty and
    /// is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => {
                    info!("📂 STORE OPEN: {} ({} keys)", path.display(), map.len());
                    map
                }
                Err(e) => {
                    warn!("⚠️ STORE CORRUPT: {} ({}), starting empty", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("📭 STORE NEW: {}", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("⚠️ STORE UNREADABLE: {} ({}), starting empty", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        let json = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::with_source(ErrorCode::StoreWriteFailed, "create dir", e))?;
        }

        // Write-then-rename so a crash never leaves half a document
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| AppError::with_source(ErrorCode::StoreWriteFailed, "write temp file", e))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| AppError::with_source(ErrorCode::StoreWriteFailed, "rename temp file", e))?;
        Ok(())
    }

    fn mutate<F>(&self, op: F) -> AppResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AppError::store_write("store lock poisoned"))?;
        op(&mut entries);
        self.flush(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }
}

// ============================================
// Fail-soft helpers
// ============================================

/// Read and decode a JSON value. Missing or malformed → `None`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("⚠️ STORE MALFORMED: {} ({}), treating as absent", key, e);
            None
        }
    }
}

/// Read a struct-shaped value. Anything but a JSON object → `None`.
///
/// Derived `Deserialize` impls also accept sequences (`[1,2,3]` decodes as
/// a three-field struct), so the shape is checked before decoding.
pub fn read_json_object<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    read_shaped(store, key, "an object", Value::is_object)
}

/// Read a list of struct-shaped records. Any non-object element → `None`.
pub fn read_json_records<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<Vec<T>> {
    read_shaped(store, key, "a list of objects", |value| {
        value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_object))
    })
}

fn read_shaped<T, F>(store: &dyn KeyValueStore, key: &str, expected: &str, accept: F) -> Option<T>
where
    T: DeserializeOwned,
    F: Fn(&Value) -> bool,
{
    let value: Value = read_json(store, key)?;
    if !accept(&value) {
        warn!("⚠️ STORE MALFORMED: {} (expected {}), treating as absent", key, expected);
        return None;
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("⚠️ STORE MALFORMED: {} ({}), treating as absent", key, e);
            None
        }
    }
}

/// Encode and write a JSON value. Failures are logged, never returned.
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    let encoded = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!("⚠️ STORE ENCODE FAILED: {} ({})", key, e);
            return false;
        }
    };
    write_raw(store, key, &encoded)
}

/// Write a raw string. Failures are logged, never returned.
pub fn write_raw(store: &dyn KeyValueStore, key: &str, value: &str) -> bool {
    match store.set(key, value) {
        Ok(()) => {
            debug!("💾 STORE SET: {} ({} bytes)", key, value.len());
            true
        }
        Err(e) => {
            warn!("⚠️ STORE WRITE FAILED: {} {}", key, e);
            false
        }
    }
}

/// Remove a key. Failures are logged, never returned.
pub fn remove_soft(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!("⚠️ STORE REMOVE FAILED: {} {}", key, e);
    }
}
