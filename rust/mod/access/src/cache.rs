use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Outcome of the last fetch for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Loading,
    Success,
    Error(String),
}

/// Cached query result for one key.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub data: Option<V>,
    pub status: QueryStatus,
    pub last_fetched: Option<Instant>,
}

/// Query results keyed by `K`, with explicit invalidation.
///
/// A successful entry is fresh for `stale_after`; after that callers should
/// refetch. A failed fetch drops any previous data.
pub struct QueryCache<K, V> {
    stale_after: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash + Clone, V: Clone> QueryCache<K, V> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Data for `key` if the last fetch succeeded and is not stale.
    pub fn fresh(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).and_then(|entry| match (&entry.status, entry.last_fetched) {
            (QueryStatus::Success, Some(at)) if at.elapsed() < self.stale_after => {
                entry.data.clone()
            }
            _ => None,
        })
    }

    /// Mark `key` as loading. Existing data is kept until the fetch resolves.
    pub fn begin_fetch(&self, key: K) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(key)
            .and_modify(|entry| entry.status = QueryStatus::Loading)
            .or_insert(CacheEntry {
                data: None,
                status: QueryStatus::Loading,
                last_fetched: None,
            });
    }

    pub fn complete(&self, key: K, data: V) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                data: Some(data),
                status: QueryStatus::Success,
                last_fetched: Some(Instant::now()),
            },
        );
    }

    pub fn fail(&self, key: K, message: impl Into<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                data: None,
                status: QueryStatus::Error(message.into()),
                last_fetched: Some(Instant::now()),
            },
        );
    }

    /// Drop `key`. Returns true if it was cached.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key).is_some()
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let cache: QueryCache<String, Vec<u32>> = QueryCache::new(Duration::from_secs(60));
        let key = "u1".to_string();
        assert!(cache.get(&key).is_none());

        cache.begin_fetch(key.clone());
        let entry = cache.get(&key).unwrap();
        assert_eq!(entry.status, QueryStatus::Loading);
        assert!(entry.data.is_none());
        assert!(cache.fresh(&key).is_none());

        cache.complete(key.clone(), vec![1, 2]);
        assert_eq!(cache.fresh(&key), Some(vec![1, 2]));
        assert!(cache.get(&key).unwrap().last_fetched.is_some());

        // Refetch keeps the old data visible while loading.
        cache.begin_fetch(key.clone());
        assert_eq!(cache.get(&key).unwrap().data, Some(vec![1, 2]));
        assert!(cache.fresh(&key).is_none());
    }

    #[test]
    fn test_failure_drops_data() {
        let cache: QueryCache<&str, u32> = QueryCache::new(Duration::from_secs(60));
        cache.complete("u1", 7);
        cache.fail("u1", "connection refused");
        let entry = cache.get(&"u1").unwrap();
        assert_eq!(entry.status, QueryStatus::Error("connection refused".into()));
        assert!(entry.data.is_none());
        assert!(cache.fresh(&"u1").is_none());
    }

    #[test]
    fn test_stale_entries_are_not_fresh() {
        let cache: QueryCache<&str, u32> = QueryCache::new(Duration::ZERO);
        cache.complete("u1", 7);
        assert!(cache.fresh(&"u1").is_none());
        assert_eq!(cache.get(&"u1").unwrap().data, Some(7));
    }

    #[test]
    fn test_invalidate() {
        let cache: QueryCache<&str, u32> = QueryCache::new(Duration::from_secs(60));
        cache.complete("u1", 1);
        cache.complete("u2", 2);
        assert!(cache.invalidate(&"u1"));
        assert!(!cache.invalidate(&"u1"));
        assert_eq!(cache.len(), 1);
        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
