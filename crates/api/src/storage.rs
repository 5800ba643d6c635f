//! Client-side key-value storage.
//!
//! Plays the role browser `localStorage` and `sessionStorage` play for a web
//! storefront: a flat map of string keys to string values that survives
//! between requests. Values are usually JSON documents, but the store does
//! not interpret them; callers decide what a malformed value means.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - process-local, gone on exit (session-scoped data, tests)
//! - [`FileStore`] - one JSON object file on disk (persistent data)

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Bearer token returned by login/register.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// JSON-encoded user returned by login/register.
    pub const CURRENT_USER: &str = "current_user";

    /// JSON-encoded list of cart items.
    pub const CART: &str = "cart";

    /// Summary of the last cash-on-delivery order, for the success screen.
    pub const LAST_ORDER: &str = "lastOrder";

    /// Payment gateway order code of an online payment in progress.
    pub const PAYMENT_ORDER_CODE: &str = "paymentOrderCode";

    /// Backend order ID of an online payment in progress.
    pub const ORDER_ID: &str = "orderId";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {reason}")]
    Corrupt {
        /// Path of the backing file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The store cannot be used at all (e.g. a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A flat string-to-string store.
///
/// Implementations must be safe to share between tasks; every method takes
/// `&self`.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store, discarded when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries)?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Store backed by a single JSON object file.
///
/// Every operation re-reads the file so separate processes sharing the file
/// see each other's writes. Writes go to a temporary file in the same
/// directory and are renamed into place, so a crash never leaves a
/// half-written file. Concurrent writers from different processes are not
/// coordinated: the last write wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// The parent directory is created if needed. The file itself is only
    /// created on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(entries).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = lock(&self.write_lock)?;
        let mut entries = self.load()?;
        apply(&mut entries);
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set(keys::AUTH_TOKEN, "tok").unwrap();
        assert_eq!(store.get(keys::AUTH_TOKEN).unwrap().as_deref(), Some("tok"));

        store.remove(keys::AUTH_TOKEN).unwrap();
        assert_eq!(store.get(keys::AUTH_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("never-set").is_ok());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        let store = FileStore::open(&path).unwrap();
        store.set(keys::CART, "[]").unwrap();
        store.set(keys::AUTH_TOKEN, "abc").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::CART).unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get(keys::AUTH_TOKEN).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested/dir/local.json")).unwrap();
        assert_eq!(store.get(keys::CART).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(matches!(
            store.get(keys::CART),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("session.json")).unwrap();
        store.set(keys::ORDER_ID, "ord_1").unwrap();
        store.remove(keys::ORDER_ID).unwrap();
        assert_eq!(store.get(keys::ORDER_ID).unwrap(), None);
        assert!(store.remove(keys::ORDER_ID).is_ok());
    }
}
