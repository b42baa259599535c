//! Core Store implementation

use eyre::{Context, Result, bail};
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{KEY_EXTENSION, LOCK_FILE};

/// A value that lives in a named collection and is addressed by id
pub trait Record: Serialize + DeserializeOwned {
    /// Unique id within the collection
    fn id(&self) -> String;

    /// Key under which the collection is stored
    fn collection_name() -> &'static str;
}

/// Statistics for a store
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Number of keys
    pub key_count: usize,
    /// Total bytes across all keys
    pub total_bytes: u64,
}

/// The main key-value store
pub struct Store {
    /// Base path for storage
    base_path: PathBuf,
}

impl Store {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened plan store");
        Ok(Self { base_path })
    }

    /// Directory backing this store
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Read the raw string value of a key
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        self.with_shared_lock(|| {
            if !path.exists() {
                return Ok(None);
            }
            let content = fs::read_to_string(&path).context(format!("Failed to read key: {}", key))?;
            Ok(Some(content))
        })
    }

    /// Write the raw string value of a key
    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.with_exclusive_lock(|| write_atomic(&path, value))
    }

    /// Remove a key, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let path = self.key_path(key)?;
        self.with_exclusive_lock(|| {
            if !path.exists() {
                return Ok(false);
            }
            fs::remove_file(&path).context(format!("Failed to remove key: {}", key))?;
            info!(key, "Removed key");
            Ok(true)
        })
    }

    /// List all keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(KEY_EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Read a key as a typed JSON document
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(content) => {
                let value = serde_json::from_str(&content).context(format!("Failed to parse key: {}", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Write a typed value as a JSON document
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        self.set_raw(key, &content)
    }

    /// Load every record of a collection in insertion order
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        Ok(self.get::<Vec<R>>(R::collection_name())?.unwrap_or_default())
    }

    /// Find a record by id
    pub fn find<R: Record>(&self, id: &str) -> Result<Option<R>> {
        Ok(self.list::<R>()?.into_iter().find(|r| r.id() == id))
    }

    /// Append a record to its collection
    pub fn append<R: Record>(&self, record: &R) -> Result<()> {
        let id = record.id();
        self.modify_collection::<R, _>(|records| {
            for slot in records.iter() {
                if slot_id::<R>(slot)? == id {
                    bail!("Record {} already exists in {}", id, R::collection_name());
                }
            }
            records.push(serde_json::to_value(record)?);
            Ok(())
        })?;
        info!(id, collection = R::collection_name(), "Appended record");
        Ok(())
    }

    /// Replace a record with the same id, returning whether it was found
    pub fn update<R: Record>(&self, record: &R) -> Result<bool> {
        let id = record.id();
        let mut found = false;
        self.modify_collection::<R, _>(|records| {
            for slot in records.iter_mut() {
                if slot_id::<R>(slot)? == id {
                    *slot = serde_json::to_value(record)?;
                    found = true;
                    break;
                }
            }
            Ok(())
        })?;
        debug!(id, found, "update: done");
        Ok(found)
    }

    /// Mutate one record in place under the collection lock
    ///
    /// Returns None when no record has that id. The closure's result is only
    /// persisted when it returns Ok.
    pub fn modify<R, T, F>(&self, id: &str, f: F) -> Result<Option<T>>
    where
        R: Record,
        F: FnOnce(&mut R) -> Result<T>,
    {
        let mut f = Some(f);
        let mut out = None;
        self.modify_collection::<R, _>(|records| {
            for slot in records.iter_mut() {
                let mut record: R = serde_json::from_value(slot.clone())
                    .context(format!("Malformed record in collection {}", R::collection_name()))?;
                if record.id() != id {
                    continue;
                }
                if let Some(f) = f.take() {
                    out = Some(f(&mut record)?);
                    *slot = serde_json::to_value(&record)?;
                }
                break;
            }
            Ok(())
        })?;
        debug!(id, found = out.is_some(), "modify: done");
        Ok(out)
    }

    /// Delete a record by id, returning whether it was found
    pub fn delete<R: Record>(&self, id: &str) -> Result<bool> {
        let mut found = false;
        self.modify_collection::<R, _>(|records| {
            let before = records.len();
            let mut kept = Vec::with_capacity(before);
            for slot in records.drain(..) {
                if slot_id::<R>(&slot)? != id {
                    kept.push(slot);
                }
            }
            found = kept.len() != before;
            *records = kept;
            Ok(())
        })?;
        Ok(found)
    }

    /// Compute store statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let keys = self.keys()?;
        let mut total_bytes = 0u64;
        for key in &keys {
            total_bytes += fs::metadata(self.key_path(key)?)?.len();
        }
        Ok(StoreStats {
            key_count: keys.len(),
            total_bytes,
        })
    }

    /// Read-modify-write a collection under one exclusive lock
    ///
    /// Records are handled as raw JSON values so that a document written by a
    /// newer schema survives an update from an older one.
    fn modify_collection<R, F>(&self, f: F) -> Result<()>
    where
        R: Record,
        F: FnOnce(&mut Vec<serde_json::Value>) -> Result<()>,
    {
        let key = R::collection_name();
        let path = self.key_path(key)?;
        self.with_exclusive_lock(|| {
            let mut records: Vec<serde_json::Value> = if path.exists() {
                let content = fs::read_to_string(&path).context(format!("Failed to read key: {}", key))?;
                serde_json::from_str(&content).context(format!("Collection {} is not a JSON array", key))?
            } else {
                Vec::new()
            };
            f(&mut records)?;
            write_atomic(&path, &serde_json::to_string_pretty(&records)?)
        })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            bail!("Invalid key '{}': use ASCII letters, digits, '-' or '_'", key);
        }
        Ok(self.base_path.join(format!("{}.{}", key, KEY_EXTENSION)))
    }

    fn lock_file(&self) -> Result<fs::File> {
        fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.base_path.join(LOCK_FILE))
            .context("Failed to open store lock file")
    }

    fn with_shared_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.lock_file()?;
        FileExt::lock_shared(&lock).context("Failed to acquire shared store lock")?;
        let result = f();
        let _ = FileExt::unlock(&lock);
        result
    }

    fn with_exclusive_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.lock_file()?;
        FileExt::lock_exclusive(&lock).context("Failed to acquire exclusive store lock")?;
        let result = f();
        let _ = FileExt::unlock(&lock);
        result
    }
}

fn slot_id<R: Record>(slot: &serde_json::Value) -> Result<String> {
    let record: R = serde_json::from_value(slot.clone())
        .context(format!("Malformed record in collection {}", R::collection_name()))?;
    Ok(record.id())
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension(format!("{}.tmp", KEY_EXTENSION));
    fs::write(&tmp, content).context(format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).context(format!("Failed to replace {}", path.display()))?;
    Ok(())
}
