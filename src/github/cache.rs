use crate::config::Config;
use crate::error::Result;
use crate::stats::ActivitySnapshot;
use chrono::{DateTime, Duration, Utc};
use sled::Db;
use std::path::Path;

/// Cache for fetched activity snapshots
pub struct SnapshotCache {
    db: Db,
    ttl_hours: u32,
}

impl SnapshotCache {
    /// Create or open a cache
    pub fn new(cache_dir: &Path, ttl_hours: u32) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)?;

        let db_path = cache_dir.join("snapshots.sled");
        let db = sled::open(db_path)?;

        Ok(Self { db, ttl_hours })
    }

    /// Create cache from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache_dir = Config::default_cache_dir()?;
        Self::new(&cache_dir, config.cache_ttl_hours)
    }

    /// Key for one source/user/year/scope combination
    pub fn generate_key(source: &str, user: &str, year: i32, scope: Option<&str>) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        user.to_lowercase().hash(&mut hasher);
        year.hash(&mut hasher);
        scope.hash(&mut hasher);

        format!("snapshot_{}_{:x}", year, hasher.finish())
    }

    /// Get a snapshot if present and not expired
    pub fn get(&self, key: &str) -> Result<Option<ActivitySnapshot>> {
        let Some(data) = self.db.get(key)? else {
            return Ok(None);
        };

        let cached: CachedSnapshot = match serde_json::from_slice(&data) {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Dropping unreadable cache entry {}: {}", key, e);
                self.db.remove(key)?;
                return Ok(None);
            }
        };

        if self.is_expired(&cached.cached_at) {
            tracing::debug!("Cache entry {} expired", key);
            self.db.remove(key)?;
            return Ok(None);
        }

        Ok(Some(cached.snapshot))
    }

    /// Store a snapshot
    pub fn set(&self, key: &str, snapshot: &ActivitySnapshot) -> Result<()> {
        let cached = CachedSnapshotRef {
            snapshot,
            cached_at: Utc::now(),
        };

        let data = serde_json::to_vec(&cached)?;
        self.db.insert(key, data)?;
        self.db.flush()?;

        Ok(())
    }

    fn is_expired(&self, cached_at: &DateTime<Utc>) -> bool {
        Utc::now() - *cached_at > Duration::hours(self.ttl_hours as i64)
    }

    /// Clear all cache entries
    pub fn clear(&self) -> Result<()> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.db.len(),
            db_size_bytes: self.db.size_on_disk().unwrap_or(0),
        }
    }

    /// Remove expired entries, returning how many went
    pub fn cleanup_expired(&self) -> Result<usize> {
        let mut removed = 0;

        for item in self.db.iter() {
            let (key, value) = item?;

            if let Ok(cached) = serde_json::from_slice::<CachedSnapshot>(&value) {
                if self.is_expired(&cached.cached_at) {
                    self.db.remove(key)?;
                    removed += 1;
                }
            }
        }

        self.db.flush()?;
        Ok(removed)
    }
}

#[derive(Debug, serde::Deserialize)]
struct CachedSnapshot {
    snapshot: ActivitySnapshot,
    cached_at: DateTime<Utc>,
}

#[derive(Debug, serde::Serialize)]
struct CachedSnapshotRef<'a> {
    snapshot: &'a ActivitySnapshot,
    cached_at: DateTime<Utc>,
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub db_size_bytes: u64,
}

impl CacheStats {
    /// Format size in human-readable format
    pub fn format_size(&self) -> String {
        let bytes = self.db_size_bytes;
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.2} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
