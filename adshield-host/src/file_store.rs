//! File-backed key-value store
//!
//! All keys live in one JSON object on disk. Writes go to a sibling temp file
//! that is then renamed over the original, so a crash mid-write leaves the
//! previous contents intact. A file that no longer parses is moved aside to
//! `<name>.corrupt` on the next write.

use adshield_core::{AdShieldError, KeyValueStore};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write of the backing file within this process
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

    /// Raw file contents, `None` when the file is missing or blank
    fn read_raw(&self, key: &str) -> adshield_core::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AdShieldError::store(key, e)),
        }
    }

    fn load(&self, key: &str) -> adshield_core::Result<Entries> {
        match self.read_raw(key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                AdShieldError::store(key, format!("corrupt store file {}: {}", self.path.display(), e))
            }),
            None => Ok(Entries::new()),
        }
    }

    /// Like [`load`](Self::load), but a corrupt file is moved aside and replaced by an empty map
    fn load_for_write(&self, key: &str) -> adshield_core::Result<Entries> {
        let Some(raw) = self.read_raw(key)? else {
            return Ok(Entries::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let aside = self.path.with_extension("corrupt");
                warn!(
                    path = %self.path.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "Store file unreadable, starting a fresh one"
                );
                fs::rename(&self.path, &aside).map_err(|e| AdShieldError::store(key, e))?;
                Ok(Entries::new())
            }
        }
    }

    fn save(&self, key: &str, entries: &Entries) -> adshield_core::Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| AdShieldError::store(key, e))?;
        }

        let encoded = serde_json::to_string_pretty(entries)
            .map_err(|e| AdShieldError::Encode(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded).map_err(|e| AdShieldError::store(key, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| AdShieldError::store(key, e))?;
        debug!(path = %self.path.display(), key = %key, "Store file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> adshield_core::Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|e| AdShieldError::store(key, e))?;
        Ok(self.load(key)?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> adshield_core::Result<()> {
        let _guard = self.lock.lock().map_err(|e| AdShieldError::store(key, e))?;
        let mut entries = self.load_for_write(key)?;
        entries.insert(key.to_string(), value.to_string());
        self.save(key, &entries)
    }
}
