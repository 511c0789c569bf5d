// src/github/cache.rs
// =============================================================================
// A small time-to-live cache for contributor lists.
//
// - Entries live in a HashMap keyed by the lowercase "owner/repo"
// - An entry is served only while it is younger than the TTL
// - When a file path is set, every insert rewrites the file as JSON so the
//   next run of the tool can reuse recent answers
//
// The *_at methods take "now" as a parameter so tests can move the clock.
// =============================================================================

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::Contributor;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fetched_at: DateTime<Utc>,
    pub contributors: Vec<Contributor>,
}

#[derive(Debug)]
pub struct ContributorCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
    path: Option<PathBuf>,
}

impl ContributorCache {
    // A cache that only lives as long as the process
    pub fn in_memory(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            path: None,
        }
    }

    // Loads a cache file if one exists
    //
    // A missing, unreadable or corrupt file is not an error: we just start
    // empty. Expired entries are dropped right away.
    pub fn load(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let path = path.into();
        let mut entries: HashMap<String, CacheEntry> = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring corrupt cache file");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        let now = Utc::now();
        entries.retain(|_, entry| is_fresh(entry, ttl, now));
        debug!(path = %path.display(), entries = entries.len(), "loaded contributor cache");

        Self {
            ttl,
            entries,
            path: Some(path),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<Vec<Contributor>> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&mut self, key: &str, now: DateTime<Utc>) -> Option<Vec<Contributor>> {
        let fresh = self.entries.get(key).map(|entry| is_fresh(entry, self.ttl, now))?;

        if fresh {
            self.entries.get(key).map(|entry| entry.contributors.clone())
        } else {
            debug!(key, "cache entry expired");
            self.entries.remove(key);
            None
        }
    }

    pub fn insert(&mut self, key: &str, contributors: Vec<Contributor>) {
        self.insert_at(key, contributors, Utc::now());
    }

    pub fn insert_at(&mut self, key: &str, contributors: Vec<Contributor>, now: DateTime<Utc>) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                fetched_at: now,
                contributors,
            },
        );
        self.persist();
    }

    // Drops every entry and removes the cache file
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Some(path) = &self.path {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "could not remove cache file");
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Writes the cache file; failures are logged and otherwise ignored
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let result = serde_json::to_string(&self.entries)
            .map_err(std::io::Error::from)
            .and_then(|raw| {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, raw)
            });

        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "could not write cache file");
        }
    }
}

fn is_fresh(entry: &CacheEntry, ttl: Duration, now: DateTime<Utc>) -> bool {
    // A clock that went backwards still counts as fresh
    match (now - entry.fetched_at).to_std() {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn sample() -> Vec<Contributor> {
        vec![Contributor {
            login: "octocat".into(),
            avatar_url: "https://avatars.githubusercontent.com/u/1".into(),
            html_url: "https://github.com/octocat".into(),
            contributions: 7,
        }]
    }

    #[test]
    fn test_entry_served_within_ttl() {
        let mut cache = ContributorCache::in_memory(Duration::from_secs(60));
        let t0 = Utc::now();
        cache.insert_at("a/b", sample(), t0);

        let hit = cache.get_at("a/b", t0 + TimeDelta::seconds(59));
        assert_eq!(hit, Some(sample()));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let mut cache = ContributorCache::in_memory(Duration::from_secs(60));
        let t0 = Utc::now();
        cache.insert_at("a/b", sample(), t0);

        assert!(cache.get_at("a/b", t0 + TimeDelta::seconds(60)).is_none());
        assert!(cache.is_empty(), "expired entries are evicted");
    }

    #[test]
    fn test_miss_for_unknown_key() {
        let mut cache = ContributorCache::in_memory(DEFAULT_TTL);
        assert!(cache.get("nobody/nothing").is_none());
    }

    #[test]
    fn test_file_backed_cache_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("contributors.json");

        let mut cache = ContributorCache::load(&path, DEFAULT_TTL);
        cache.insert("a/b", sample());
        assert!(path.exists());

        let mut reloaded = ContributorCache::load(&path, DEFAULT_TTL);
        assert_eq!(reloaded.get("a/b"), Some(sample()));
    }

    #[test]
    fn test_expired_entries_dropped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contributors.json");

        let mut cache = ContributorCache::load(&path, DEFAULT_TTL);
        cache.insert_at("a/b", sample(), Utc::now() - TimeDelta::hours(1));

        let reloaded = ContributorCache::load(&path, DEFAULT_TTL);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contributors.json");
        fs::write(&path, "{not json").unwrap();

        let cache = ContributorCache::load(&path, DEFAULT_TTL);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contributors.json");

        let mut cache = ContributorCache::load(&path, DEFAULT_TTL);
        cache.insert("a/b", sample());
        cache.clear();

        assert!(cache.is_empty());
        assert!(!path.exists());
    }
}
