use crate::rates::models::RateTable;
use crate::store::{read_document, write_document};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = "rates.json";

/// Last successfully fetched rate table.
#[derive(Debug, Clone)]
pub struct RateCache {
    path: PathBuf,
}

impl RateCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CACHE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<RateTable>> {
        read_document(&self.path)
    }

    pub fn save(&self, table: &RateTable) -> Result<()> {
        write_document(&self.path, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::models::RateOrigin;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_empty_cache() {
        let dir = tempdir().unwrap();
        let cache = RateCache::in_dir(dir.path());
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let cache = RateCache::in_dir(dir.path());

        let mut table = RateTable::defaults().with_origin(RateOrigin::Live);
        table.fetched_at = Some(Utc::now());
        cache.save(&table).unwrap();

        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded, table);
    }
}
