//! JSON file persistence for the DRM cache

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::cache::DrmCache;
use crate::error::CacheError;

type Result<T> = std::result::Result<T, CacheError>;

/// File-backed store for [`DrmCache`]
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Store at the default XDG cache location
    pub fn open() -> Result<Self> {
        Ok(Self::at(Self::cache_dir()?.join("cache.json")))
    }

    /// Store at an explicit path, or the default location when `None`
    pub fn open_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Ok(Self::at(p)),
            None => Self::open(),
        }
    }

    /// Store at a specific file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the cache directory path (~/.cache/drmscope on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("drmscope"))
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache file.
    ///
    /// A missing, unreadable, or malformed file yields an empty cache.
    pub fn load(&self) -> DrmCache {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return DrmCache::new(),
            Err(e) => {
                log::warn!("Failed to read cache {}: {}", self.path.display(), e);
                return DrmCache::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(cache) => cache,
            Err(e) => {
                log::warn!(
                    "Ignoring corrupt cache {}: {}",
                    self.path.display(),
                    e
                );
                DrmCache::new()
            }
        }
    }

    /// Replace the cache file with `cache`.
    ///
    /// Each save writes its own temp file next to the target and renames it
    /// over the target, so overlapping saves never share a temp file.
    pub fn save(&self, cache: &DrmCache) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let json = serde_json::to_string_pretty(cache)
            .map_err(|e| CacheError::Serialize(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| CacheError::Io(format!("Failed to create temp file: {}", e)))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| CacheError::Io(format!("Failed to write cache: {}", e)))?;
        tmp.persist(&self.path)
            .map_err(|e| CacheError::Io(format!("Failed to replace cache: {}", e.error)))?;

        log::debug!(
            "Saved {} cache records to {}",
            cache.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Delete the cache file, returning how many records it held
    pub fn clear(&self) -> Result<usize> {
        let removed = self.load().len();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(removed),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(CacheError::Io(format!("Failed to remove cache: {}", e))),
        }
    }
}
