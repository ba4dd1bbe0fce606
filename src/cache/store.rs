//! Cache backing stores.
//!
//! The file store reads the whole document on every load and rewrites it on
//! every save. There is no locking and no atomic replace: two processes
//! writing the same file can lose each other's updates or read a partially
//! written file, which then loads as corrupt and is treated as empty.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;

use super::types::CacheMap;
use crate::error_handling::CacheError;

/// Where the cache document lives.
pub trait CacheStore {
    fn load(&self) -> Result<CacheMap, CacheError>;
    fn save(&self, entries: &CacheMap) -> Result<(), CacheError>;
}

impl<S: CacheStore + ?Sized> CacheStore for std::sync::Arc<S> {
    fn load(&self) -> Result<CacheMap, CacheError> {
        (**self).load()
    }

    fn save(&self, entries: &CacheMap) -> Result<(), CacheError> {
        (**self).save(entries)
    }
}

/// A single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Opens the store at `path`, creating an empty cache file (and its parent
    /// directories) if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Io` if the file or directories cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, "{}")?;
            debug!("Created empty cache file {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for FileStore {
    fn load(&self) -> Result<CacheMap, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CacheMap::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(CacheMap::new());
        }

        let mut entries: CacheMap = serde_json::from_str(&content)?;
        for (url, entry) in entries.iter_mut() {
            entry.url = url.clone();
        }
        Ok(entries)
    }

    fn save(&self, entries: &CacheMap) -> Result<(), CacheError> {
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// An in-process store, for tests and for callers that want a cache without
/// touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<CacheMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<CacheMap, CacheError> {
        Ok(self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, entries: &CacheMap) -> Result<(), CacheError> {
        *self.entries.lock().unwrap_or_else(|e| e.into_inner()) = entries.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use crate::fetch::Headers;

    fn entry(url: &str) -> CacheEntry {
        CacheEntry {
            url: url.to_string(),
            fetched_at: 10.5,
            status_code: Some(200),
            headers: [("Content-Type", "text/plain")].into_iter().collect(),
            body: "body".to_string(),
            hop_limit_exceeded: false,
        }
    }

    #[test]
    fn test_open_creates_missing_file_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let store = FileStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_empty_file_loads_as_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "  \n").unwrap();
        assert!(FileStore::open(&path).unwrap().load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();
        let result = FileStore::open(&path).unwrap().load();
        assert!(matches!(result, Err(CacheError::Corrupt(_))));
    }

    #[test]
    fn test_save_then_load_restores_urls_from_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("cache.json")).unwrap();
        let mut entries = CacheMap::new();
        entries.insert("http://a.com/".to_string(), entry("http://a.com/"));
        store.save(&entries).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, entries);
        assert_eq!(loaded["http://a.com/"].url, "http://a.com/");
    }

    #[test]
    fn test_file_format_is_named_record_keyed_by_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("cache.json")).unwrap();
        let mut entries = CacheMap::new();
        entries.insert("example.com/a".to_string(), entry("example.com/a"));
        store.save(&entries).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let record = &raw["example.com/a"];
        assert_eq!(record["fetched_at"], 10.5);
        assert_eq!(record["status_code"], 200);
        assert_eq!(record["headers"]["Content-Type"], "text/plain");
        assert_eq!(record["body"], "body");
        assert!(record.get("url").is_none());
    }

    #[test]
    fn test_null_status_is_accepted_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(
            &path,
            r#"{"u": {"fetched_at": 1, "status_code": null, "headers": {}, "body": ""}}"#,
        )
        .unwrap();
        let loaded = FileStore::open(&path).unwrap().load().unwrap();
        assert_eq!(loaded["u"].status_code, None);
        assert_eq!(loaded["u"].headers, Headers::new());
        assert!(!loaded["u"].hop_limit_exceeded);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let mut entries = CacheMap::new();
        entries.insert("u".to_string(), entry("u"));
        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);
    }
}
