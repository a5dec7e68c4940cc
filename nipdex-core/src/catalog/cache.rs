//! On-disk cache of fetched NIPs index documents
//!
//! One YAML file per source URL. Entries older than the TTL are treated as
//! missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Cached document with its fetch time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDocument {
    /// When the document was cached (Unix timestamp)
    pub cached_at: u64,

    /// Where the document was fetched from
    pub url: String,

    /// The decoded document text
    pub content: String,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct DocumentCache {
    dir: PathBuf,
    ttl: Duration,
}

impl DocumentCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get cache file path for a URL
    pub fn path_for_url(&self, url: &str) -> PathBuf {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        let hash = hasher.finish();

        self.dir.join(format!("document_{hash:016x}.yaml"))
    }

    /// Load the cached document for `url` if present and fresh
    pub fn load(&self, url: &str) -> Result<Option<String>> {
        let cache_path = self.path_for_url(url);

        if !cache_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&cache_path)
            .with_context(|| format!("Failed to read cache: {}", cache_path.display()))?;

        let cached: CachedDocument = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse cache: {}", cache_path.display()))?;

        if cached.url != url {
            tracing::debug!("Cache file {} belongs to {}", cache_path.display(), cached.url);
            return Ok(None);
        }

        let age = Duration::from_secs(unix_now().saturating_sub(cached.cached_at));

        if age > self.ttl {
            tracing::debug!("Cache expired for {} (age: {:?})", url, age);
            return Ok(None);
        }

        tracing::debug!("Using cached document for {} (age: {:?})", url, age);
        Ok(Some(cached.content))
    }

    /// Save a document to the cache
    pub fn save(&self, url: &str, content: &str) -> Result<()> {
        self.save_at(url, content, unix_now())
    }

    fn save_at(&self, url: &str, content: &str, cached_at: u64) -> Result<()> {
        let cache_path = self.path_for_url(url);

        let cached = CachedDocument {
            cached_at,
            url: url.to_string(),
            content: content.to_string(),
        };

        let serialized = serde_yaml_ng::to_string(&cached).context("Failed to serialize cache")?;

        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create cache directory: {}", self.dir.display())
        })?;

        std::fs::write(&cache_path, serialized)
            .with_context(|| format!("Failed to write cache: {}", cache_path.display()))?;

        tracing::debug!("Saved document to cache: {}", cache_path.display());
        Ok(())
    }

    /// Remove all cached documents, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();

            let is_document = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("document_") && n.ends_with(".yaml"));

            if path.is_file() && is_document {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod cache_tests {
    use super::*;
    use tempfile::TempDir;

    const URL: &str = "https://api.github.com/repos/nostr-protocol/nips/contents/README.md";

    #[test]
    fn test_path_for_url() {
        let cache = DocumentCache::new("/tmp/nipdex", Duration::from_secs(60));
        let path1 = cache.path_for_url("https://example.com/a");
        let path2 = cache.path_for_url("https://example.com/b");

        assert_ne!(path1, path2);
        assert!(path1.to_string_lossy().contains("document_"));
        assert!(path1.to_string_lossy().ends_with(".yaml"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp_dir.path(), Duration::from_secs(60));

        cache.save(URL, "- [NIP-01: Basic](01.md)\n").unwrap();

        let loaded = cache.load(URL).unwrap();
        assert_eq!(loaded.as_deref(), Some("- [NIP-01: Basic](01.md)\n"));
    }

    #[test]
    fn test_miss_on_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp_dir.path(), Duration::from_secs(60));
        assert!(cache.load(URL).unwrap().is_none());
    }

    #[test]
    fn test_expired_entry_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp_dir.path(), Duration::from_secs(60));

        cache.save_at(URL, "old", unix_now() - 3600).unwrap();
        assert!(cache.load(URL).unwrap().is_none());
    }

    #[test]
    fn test_clear_only_removes_documents() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp_dir.path(), Duration::from_secs(60));

        cache.save(URL, "a").unwrap();
        cache.save("https://example.com/other.md", "b").unwrap();
        std::fs::write(temp_dir.path().join("keep.txt"), "x").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.load(URL).unwrap().is_none());
        assert!(temp_dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_clear_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DocumentCache::new(temp_dir.path().join("absent"), Duration::from_secs(60));
        assert_eq!(cache.clear().unwrap(), 0);
    }
}
