//! Last-known-good task cache.
//!
//! A single slot holding the most recent grouped fetch result plus the
//! time it was written. The dashboard paints from this slot instantly
//! on load while a live fetch runs, so a miss is a normal state and
//! reads never fail. Writes overwrite the whole snapshot; there is no
//! merge and no history.

use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::notion::schema::GroupedTasks;

/// The cached snapshot: grouped tasks plus an epoch-ms write stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub tasks: GroupedTasks,
    pub cached_at: i64,
}

impl CacheEntry {
    /// Age-based freshness probe. Advisory only: the dashboard paints
    /// stale entries anyway while a live fetch runs.
    pub fn is_fresh(&self, max_age: chrono::Duration) -> bool {
        let age = chrono::Utc::now().timestamp_millis() - self.cached_at;
        age <= max_age.num_milliseconds()
    }
}

/// Single-slot task cache.
///
/// The cache never blocks correctness: backend failures are swallowed
/// (logged by the file backend) and surface as a miss on the next read.
pub trait TaskCache: Send + Sync {
    /// Last snapshot, if one exists.
    fn read(&self) -> Option<CacheEntry>;
    /// Overwrite the slot with a fresh snapshot stamped now.
    fn write(&self, tasks: &GroupedTasks);
    /// Drop the slot. Called once after a successful status write,
    /// since the cache only knows whole-group snapshots.
    fn invalidate(&self);
}

fn stamp(tasks: &GroupedTasks) -> CacheEntry {
    CacheEntry {
        tasks: tasks.clone(),
        cached_at: chrono::Utc::now().timestamp_millis(),
    }
}

/// File-backed cache at `<data dir>/cachedTasks.json`.
pub struct FileTaskCache {
    path: PathBuf,
}

impl FileTaskCache {
    /// Cache at the default location (`~/.focusdash/cachedTasks.json`).
    pub fn new() -> Self {
        Self {
            path: crate::util::data_dir().join("cachedTasks.json"),
        }
    }

    /// Cache at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileTaskCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskCache for FileTaskCache {
    fn read(&self) -> Option<CacheEntry> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn write(&self, tasks: &GroupedTasks) {
        let entry = stamp(tasks);
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let content = serde_json::to_string(&entry)?;
            crate::util::atomic_write_str(&self.path, &content)
        })();
        if let Err(e) = result {
            log::warn!("task cache write failed: {}", e);
        }
    }

    fn invalidate(&self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!("task cache invalidate failed: {}", e);
            }
        }
    }
}

/// In-memory cache for tests and embedding contexts.
#[derive(Default)]
pub struct MemoryTaskCache {
    slot: Mutex<Option<CacheEntry>>,
}

impl TaskCache for MemoryTaskCache {
    fn read(&self) -> Option<CacheEntry> {
        self.slot.lock().clone()
    }

    fn write(&self, tasks: &GroupedTasks) {
        *self.slot.lock() = Some(stamp(tasks));
    }

    fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::schema::Task;

    fn sample_tasks() -> GroupedTasks {
        GroupedTasks {
            work: vec![Task {
                id: "page-1".to_string(),
                title: "Ship release".to_string(),
                done: false,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_memory_cache_roundtrip() {
        let cache = MemoryTaskCache::default();
        assert!(cache.read().is_none());

        cache.write(&sample_tasks());
        let entry = cache.read().expect("hit");
        assert_eq!(entry.tasks, sample_tasks());
        assert!(entry.cached_at > 0);

        cache.invalidate();
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_file_cache_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = FileTaskCache::at(dir.path().join("cachedTasks.json"));

        assert!(cache.read().is_none());

        cache.write(&sample_tasks());
        let entry = cache.read().expect("hit");
        assert_eq!(entry.tasks, sample_tasks());

        cache.invalidate();
        assert!(cache.read().is_none());
        // Invalidating an empty cache is a no-op.
        cache.invalidate();
    }

    #[test]
    fn test_write_overwrites_wholesale() {
        let cache = MemoryTaskCache::default();
        cache.write(&sample_tasks());
        cache.write(&GroupedTasks::default());

        let entry = cache.read().expect("hit");
        assert!(entry.tasks.work.is_empty());
    }

    #[test]
    fn test_corrupt_cache_file_reads_as_miss() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cachedTasks.json");
        std::fs::write(&path, "not json").expect("write");

        let cache = FileTaskCache::at(&path);
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_freshness_probe() {
        let entry = CacheEntry {
            tasks: GroupedTasks::default(),
            cached_at: chrono::Utc::now().timestamp_millis(),
        };
        assert!(entry.is_fresh(chrono::Duration::minutes(5)));

        let stale = CacheEntry {
            tasks: GroupedTasks::default(),
            cached_at: chrono::Utc::now().timestamp_millis() - 10 * 60 * 1000,
        };
        assert!(!stale.is_fresh(chrono::Duration::minutes(5)));
    }

    #[test]
    fn test_entry_external_shape() {
        let entry = CacheEntry {
            tasks: GroupedTasks::default(),
            cached_at: 1,
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert!(json.get("cachedAt").is_some());
        assert!(json.get("tasks").is_some());
    }
}
