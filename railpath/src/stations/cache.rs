//! Disk-based cache for the station list.
//!
//! The station list changes rarely and is large, so it is kept on disk
//! between runs and only refetched once it goes stale.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::StationRecord;
use super::error::StationError;

/// Snapshots older than a week are refetched.
const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// On-disk form of the station list.
#[derive(Debug, Serialize, Deserialize)]
struct StationSnapshot {
    fetched_at: DateTime<Utc>,
    stations: Vec<StationRecord>,
}

impl StationSnapshot {
    /// Whether the snapshot is older than `ttl` at `now`. A snapshot from
    /// the future (clock changes) counts as fresh.
    fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = (now - self.fetched_at).to_std().unwrap_or(Duration::ZERO);
        age >= ttl
    }
}

/// Configuration for the station disk cache.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// How long a snapshot remains usable.
    pub ttl: Duration,
}

impl StationCacheConfig {
    /// Create a new cache config with the given path and default TTL.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self::new("station_names.json")
    }
}

/// Disk cache for the station list.
#[derive(Debug, Clone)]
pub struct StationCache {
    config: StationCacheConfig,
}

impl StationCache {
    pub fn new(config: StationCacheConfig) -> Self {
        Self { config }
    }

    /// Load the cached station list.
    ///
    /// Returns `None` when the file is missing, unreadable or stale.
    pub fn load(&self) -> Option<Vec<StationRecord>> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let snapshot: StationSnapshot = match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(
                    path = %self.config.path.display(),
                    error = %e,
                    "Ignoring corrupt station cache"
                );
                return None;
            }
        };

        if snapshot.is_stale(self.config.ttl, Utc::now()) {
            debug!(
                path = %self.config.path.display(),
                fetched_at = %snapshot.fetched_at,
                "Station cache is stale"
            );
            return None;
        }

        Some(snapshot.stations)
    }

    /// Write a station list snapshot, creating parent directories as needed.
    pub fn save(&self, stations: &[StationRecord]) -> Result<(), StationError> {
        let snapshot = StationSnapshot {
            fetched_at: Utc::now(),
            stations: stations.to_vec(),
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StationError::Cache {
                message: format!("failed to create cache directory: {e}"),
            })?;
        }

        let json = serde_json::to_string(&snapshot).map_err(|e| StationError::Cache {
            message: format!("failed to serialize station list: {e}"),
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| StationError::Cache {
            message: format!("failed to write cache file: {e}"),
        })
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(code: &str, name: &str) -> StationRecord {
        StationRecord {
            code: code.to_string(),
            name: name.to_string(),
            pinyin: String::new(),
            abbreviation: String::new(),
        }
    }

    #[test]
    fn save_and_load_cache() {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("stations.json");
        let cache = StationCache::new(StationCacheConfig::new(&cache_path));

        cache
            .save(&[record("VAP", "北京北"), record("NJH", "南京")])
            .unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].code, "VAP");
        assert_eq!(loaded[1].name, "南京");
    }

    #[test]
    fn expired_cache_returns_none() {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("stations.json");
        let config = StationCacheConfig::new(&cache_path).with_ttl(Duration::from_secs(0));
        let cache = StationCache::new(config);

        cache.save(&[record("VAP", "北京北")]).unwrap();

        assert!(cache.load().is_none());
    }

    #[test]
    fn old_snapshot_is_stale() {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("stations.json");
        let snapshot = StationSnapshot {
            fetched_at: Utc::now() - chrono::Duration::days(8),
            stations: vec![record("VAP", "北京北")],
        };
        std::fs::write(&cache_path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let cache = StationCache::new(StationCacheConfig::new(&cache_path));
        assert!(cache.load().is_none());

        let lenient = StationCacheConfig::new(&cache_path).with_ttl(DEFAULT_TTL * 2);
        assert_eq!(StationCache::new(lenient).load().map(|s| s.len()), Some(1));
    }

    #[test]
    fn future_snapshot_is_fresh() {
        let snapshot = StationSnapshot {
            fetched_at: Utc::now() + chrono::Duration::hours(1),
            stations: Vec::new(),
        };
        assert!(!snapshot.is_stale(Duration::from_secs(60), Utc::now()));
    }

    #[test]
    fn missing_cache_returns_none() {
        let cache = StationCache::new(StationCacheConfig::new("/nonexistent/path/stations.json"));
        assert!(cache.load().is_none());
    }

    #[test]
    fn corrupt_cache_returns_none() {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("stations.json");
        std::fs::write(&cache_path, "not json").unwrap();

        let cache = StationCache::new(StationCacheConfig::new(&cache_path));
        assert!(cache.load().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("nested").join("dir").join("stations.json");
        let cache = StationCache::new(StationCacheConfig::new(&cache_path));

        cache.save(&[record("VAP", "北京北")]).unwrap();
        assert!(cache_path.exists());
    }
}
