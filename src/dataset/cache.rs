//! On-disk cache of downloaded dataset CSV files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Directory of raw `<name>.csv` downloads
pub struct DatasetCache {
    base_dir: PathBuf,
    max_age: Option<Duration>,
}

impl DatasetCache {
    /// Create a cache rooted at `base_dir`; entries older than `max_age` are
    /// treated as missing.
    pub fn new(base_dir: PathBuf, max_age: Option<Duration>) -> Self {
        Self { base_dir, max_age }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.csv", name))
    }

    /// Get cached bytes if present and fresh
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return None;
        }

        if let Some(max_age) = self.max_age {
            let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO);
            if age > max_age {
                debug!("Cached {} is stale ({:?} old)", path.display(), age);
                let _ = std::fs::remove_file(&path);
                return None;
            }
        }

        let bytes = std::fs::read(&path).ok()?;
        debug!("Using cached {}", path.display());
        Some(bytes)
    }

    /// Store downloaded bytes
    pub fn set(&self, name: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir).with_context(|| {
            format!("Failed to create cache directory {}", self.base_dir.display())
        })?;
        let path = self.cache_path(name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip() {
        let dir = tempdir().unwrap();
        let cache = DatasetCache::new(dir.path().join("seaborn-data"), None);

        assert!(cache.get("tips").is_none());
        cache.set("tips", b"total_bill,tip\n16.99,1.01\n").unwrap();
        assert_eq!(
            cache.get("tips").unwrap(),
            b"total_bill,tip\n16.99,1.01\n".to_vec()
        );
        assert!(dir.path().join("seaborn-data/tips.csv").exists());
    }

    #[test]
    fn test_stale_entry_is_dropped() {
        let dir = tempdir().unwrap();
        let cache = DatasetCache::new(dir.path().to_path_buf(), Some(Duration::ZERO));
        cache.set("mpg", b"mpg\n18.0\n").unwrap();
        std::thread::sleep(Duration::from_millis(20));

        assert!(cache.get("mpg").is_none());
        assert!(!dir.path().join("mpg.csv").exists());
    }
}
