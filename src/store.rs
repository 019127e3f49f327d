//! Whole-document JSON persistence.
//!
//! Each entity collection (trips, expenses, converter session) lives in
//! its own file and is read and written as one document. Read-modify-write
//! cycles run under an exclusive lock file so concurrent invocations
//! cannot interleave.

use crate::platform;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// A collection persisted as a single JSON file in the data directory.
pub trait Document: Serialize + DeserializeOwned + Default {
    const FILE_NAME: &'static str;
}

/// Read a document. A missing or empty file yields the default value.
pub fn read_document<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write a document atomically: temp file, then rename over the target.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize document")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

/// Run `f` while holding an exclusive lock on `lock_path`.
pub fn with_lock<F, R>(lock_path: &Path, f: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(lock_path)
        .context("Failed to open lock file")?;

    file.lock_exclusive().context("Failed to acquire lock")?;
    tracing::trace!(path = %lock_path.display(), "lock acquired");

    let result = f();

    file.unlock().context("Failed to unlock")?;

    result
}

/// Typed access to the documents under one data directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Open the store in the resolved data directory.
    pub fn open(data_dir_override: Option<&PathBuf>) -> Result<Self> {
        Ok(Self::new(platform::get_data_dir(data_dir_override)?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of<D: Document>(&self) -> PathBuf {
        self.root.join(D::FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join("store.lock")
    }

    /// Read without locking. May observe a document mid-update by another process.
    pub fn load<D: Document>(&self) -> Result<D> {
        let path = self.path_of::<D>();
        tracing::debug!(path = %path.display(), "loading document");
        read_document(&path)
    }

    pub fn save<D: Document>(&self, document: &D) -> Result<()> {
        let path = self.path_of::<D>();
        tracing::debug!(path = %path.display(), "saving document");
        write_document(&path, document)
    }

    /// Run `f` under the store lock. Use for changes spanning several documents.
    pub fn locked<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Store) -> Result<R>,
    {
        with_lock(&self.lock_path(), || f(self))
    }

    /// Load a document, let `f` modify it, and save it if `f` succeeds.
    pub fn update<D, F, R>(&self, f: F) -> Result<R>
    where
        D: Document,
        F: FnOnce(&mut D) -> Result<R>,
    {
        self.locked(|store| {
            let mut document = store.load::<D>()?;
            let result = f(&mut document)?;
            store.save(&document)?;
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Counter {
        value: u32,
    }

    impl Document for Counter {
        const FILE_NAME: &'static str = "counter.json";
    }

    #[test]
    fn test_missing_document_is_default() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        assert_eq!(store.load::<Counter>().unwrap(), Counter::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        fs::write(store.path_of::<Counter>(), "  \n").unwrap();
        assert_eq!(store.load::<Counter>().unwrap(), Counter::default());
    }

    #[test]
    fn test_update_saves_on_success() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());

        let returned = store
            .update::<Counter, _, _>(|counter| {
                counter.value += 5;
                Ok(counter.value)
            })
            .unwrap();

        assert_eq!(returned, 5);
        assert_eq!(store.load::<Counter>().unwrap().value, 5);
        assert!(!dir.path().join("counter.tmp").exists());
    }

    #[test]
    fn test_update_discards_on_error() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        store.save(&Counter { value: 1 }).unwrap();

        let result = store.update::<Counter, _, ()>(|counter| {
            counter.value = 99;
            anyhow::bail!("rejected")
        });

        assert!(result.is_err());
        assert_eq!(store.load::<Counter>().unwrap().value, 1);
    }

    #[test]
    fn test_corrupt_document_reports_path() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        fs::write(store.path_of::<Counter>(), "{ not json").unwrap();

        let err = store.load::<Counter>().unwrap_err();
        assert!(format!("{:#}", err).contains("counter.json"));
    }
}
