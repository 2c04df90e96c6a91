//! Locally persisted client state.
//!
//! Two values survive across sessions on the same client, each under a fixed
//! key: the anonymous student identifier and the preferred time zone.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use careerkey_core::student::AnonymousStudentId;

use crate::error::ClientError;

pub const STUDENT_ID_KEY: &str = "careerkey_student_id";
pub const TIME_ZONE_KEY: &str = "careerkey_timezone";

/// String key/value storage scoped to this client.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;

    /// Return the value under `key` if `keep` accepts it, otherwise store and
    /// return `make()`. Runs as one step with respect to other callers.
    fn get_or_insert_with(
        &self,
        key: &str,
        keep: &dyn Fn(&str) -> bool,
        make: &dyn Fn() -> String,
    ) -> Result<String, ClientError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Volatile store, for tests and ephemeral clients.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }

    fn get_or_insert_with(
        &self,
        key: &str,
        keep: &dyn Fn(&str) -> bool,
        make: &dyn Fn() -> String,
    ) -> Result<String, ClientError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = kept(&values, key, keep) {
            return Ok(existing);
        }
        let value = make();
        values.insert(key.to_string(), value.clone());
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// JSON object on disk. Writes go to a sibling temp file that is then
/// renamed over the original.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Store(format!("{} is corrupt: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(store_error(&self.path, e)),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| store_error(parent, e))?;
        }
        let bytes =
            serde_json::to_vec_pretty(values).map_err(|e| ClientError::Store(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| store_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| store_error(&self.path, e))
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), ClientError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        apply(&mut values);
        self.write_all(&values)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.update(|values| {
            values.remove(key);
        })
    }

    fn get_or_insert_with(
        &self,
        key: &str,
        keep: &dyn Fn(&str) -> bool,
        make: &dyn Fn() -> String,
    ) -> Result<String, ClientError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        if let Some(existing) = kept(&values, key, keep) {
            return Ok(existing);
        }
        let value = make();
        values.insert(key.to_string(), value.clone());
        self.write_all(&values)?;
        Ok(value)
    }
}

/// Existing accepted value under `key`, if any.
fn kept(
    values: &BTreeMap<String, String>,
    key: &str,
    keep: &dyn Fn(&str) -> bool,
) -> Option<String> {
    values.get(key).filter(|v| keep(v.as_str())).cloned()
}

fn store_error(path: &Path, err: std::io::Error) -> ClientError {
    ClientError::Store(format!("{}: {err}", path.display()))
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

/// The client's anonymous student identifier, generated and persisted on
/// first use and returned unchanged afterwards.
pub fn student_id<S: LocalStore + ?Sized>(store: &S) -> Result<AnonymousStudentId, ClientError> {
    let stored = store.get_or_insert_with(
        STUDENT_ID_KEY,
        &|value: &str| AnonymousStudentId::from_stored(value).is_some(),
        &|| {
            let id = AnonymousStudentId::generate();
            tracing::debug!(student_id = %id, "Generated anonymous student id");
            id.as_str().to_string()
        },
    )?;
    AnonymousStudentId::from_stored(stored)
        .ok_or_else(|| ClientError::Store("stored student id is unusable".into()))
}

/// Previously chosen time zone, if any. Read failures count as none.
pub fn preferred_time_zone<S: LocalStore + ?Sized>(store: &S) -> Option<String> {
    match store.get(TIME_ZONE_KEY) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read preferred time zone");
            None
        }
    }
}

pub fn save_time_zone<S: LocalStore + ?Sized>(store: &S, name: &str) -> Result<(), ClientError> {
    store.set(TIME_ZONE_KEY, name)
}

/// IANA name of this machine's zone, if it can be determined.
pub fn local_time_zone() -> Option<String> {
    iana_time_zone::get_timezone().ok()
}
