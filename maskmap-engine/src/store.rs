//! Mapping storage
//!
//! A store holds one [`UnmaskingMap`] per job id and is rewritten in full on
//! every update. [`SharedStore`] serializes the read-modify-write cycle so
//! concurrent jobs cannot overwrite each other's entries.

use crate::error::{EngineError, Result};
use crate::job::JobId;
use maskmap_core::UnmaskingMap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Every stored mapping, keyed by job id
pub type MappingTable = BTreeMap<String, UnmaskingMap>;

/// Durable job id to mapping table
pub trait MappingStore: Send {
    /// Reads the whole table
    fn load(&self) -> Result<MappingTable>;

    /// Replaces the whole table
    fn save(&mut self, table: &MappingTable) -> Result<()>;

    /// Mapping stored for `job_id`
    fn get(&self, job_id: &JobId) -> Result<UnmaskingMap> {
        self.load()?
            .remove(job_id.as_str())
            .ok_or_else(|| EngineError::MappingNotFound {
                job_id: job_id.to_string(),
            })
    }

    /// Adds the mapping for a new job.
    ///
    /// Not atomic on its own; go through [`SharedStore`] when jobs run
    /// concurrently.
    fn put(&mut self, job_id: &JobId, map: UnmaskingMap) -> Result<()> {
        let mut table = self.load()?;
        if table.contains_key(job_id.as_str()) {
            return Err(EngineError::JobExists {
                job_id: job_id.to_string(),
            });
        }
        table.insert(job_id.to_string(), map);
        self.save(&table)
    }
}

/// Mappings kept in a single JSON file
///
/// A missing, empty or unparsable file reads as an empty table. Saves go to
/// a uniquely named temporary file in the same directory which is then
/// renamed over the target, so readers never see a partial table.
///
/// Instances that share a file are not coordinated: two processes saving at
/// once each replace the whole table and the later rename wins. Share one
/// [`SharedStore`] within a process.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`; the file is created on first save
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl MappingStore for JsonFileStore {
    fn load(&self) -> Result<MappingTable> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No mapping store at {}", self.path.display());
                return Ok(MappingTable::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(MappingTable::new());
        }

        match serde_json::from_str(&content) {
            Ok(table) => Ok(table),
            Err(e) => {
                log::warn!(
                    "Mapping store {} is corrupt, treating it as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(MappingTable::new())
            }
        }
    }

    fn save(&mut self, table: &MappingTable) -> Result<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let bytes = serde_json::to_vec_pretty(table)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        log::debug!(
            "Saved {} mappings to {}",
            table.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Mappings kept in memory, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: MappingTable,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl MappingStore for MemoryStore {
    fn load(&self) -> Result<MappingTable> {
        Ok(self.table.clone())
    }

    fn save(&mut self, table: &MappingTable) -> Result<()> {
        self.table = table.clone();
        Ok(())
    }
}

/// A store shared between concurrent jobs
///
/// Every operation holds one lock, so `put` performs its load, insert and
/// save as a unit.
pub struct SharedStore<S: MappingStore> {
    inner: Arc<Mutex<S>>,
}

impl<S: MappingStore> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MappingStore> SharedStore<S> {
    /// Wrap `store`
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// See [`MappingStore::load`]
    pub fn load(&self) -> Result<MappingTable> {
        self.inner.lock().load()
    }

    /// See [`MappingStore::get`]
    pub fn get(&self, job_id: &JobId) -> Result<UnmaskingMap> {
        self.inner.lock().get(job_id)
    }

    /// See [`MappingStore::put`]
    pub fn put(&self, job_id: &JobId, map: UnmaskingMap) -> Result<()> {
        self.inner.lock().put(job_id, map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_map() -> UnmaskingMap {
        [("<PERSON_0>", "John Smith")].into_iter().collect()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("maps.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_blank_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        std::fs::write(&path, "  \n").unwrap();

        assert!(JsonFileStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("maps.json"));
        let job = JobId::generate();

        store.put(&job, sample_map()).unwrap();
        assert_eq!(store.get(&job).unwrap(), sample_map());

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("maps.json")]);
    }

    #[test]
    fn test_file_layout_is_flat_object_per_job() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        let mut store = JsonFileStore::new(&path);
        let job = JobId::parse("job-1").unwrap();
        store.put(&job, sample_map()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["job-1"]["<PERSON_0>"], "John Smith");
    }

    #[test]
    fn test_unknown_job_not_found() {
        let store = MemoryStore::new();
        let err = store.get(&JobId::parse("missing").unwrap()).unwrap_err();
        assert!(matches!(err, EngineError::MappingNotFound { job_id } if job_id == "missing"));
    }

    #[test]
    fn test_jobs_are_write_once() {
        let mut store = MemoryStore::new();
        let job = JobId::generate();
        store.put(&job, sample_map()).unwrap();

        let err = store.put(&job, UnmaskingMap::new()).unwrap_err();
        assert!(matches!(err, EngineError::JobExists { .. }));
        assert_eq!(store.get(&job).unwrap(), sample_map());
    }

    #[test]
    fn test_put_after_corruption_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        std::fs::write(&path, "garbage").unwrap();

        let mut store = JsonFileStore::new(&path);
        let job = JobId::generate();
        store.put(&job, sample_map()).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_separate_instances_save_through_distinct_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maps.json");
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut store = JsonFileStore::new(&path);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        let mut table = MappingTable::new();
                        table.insert(JobId::generate().to_string(), sample_map());
                        store.save(&table).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Whichever save landed last, the file holds one complete table
        assert_eq!(JsonFileStore::new(&path).load().unwrap().len(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_concurrent_puts_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let shared = SharedStore::new(JsonFileStore::new(dir.path().join("maps.json")));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        store.put(&JobId::generate(), sample_map()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.load().unwrap().len(), 40);
    }
}
