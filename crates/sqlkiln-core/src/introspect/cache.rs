//! Time-bounded memo for introspection results.

use std::future::Future;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// A stored value and when it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

/// Entries keyed by `(operation, argument)` that expire a fixed time after
/// they were stored.
///
/// Nothing but time invalidates an entry. Expired entries are dropped when
/// read and swept on every store. Two concurrent misses for the same key may
/// both fetch; the later store wins.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: DashMap<(&'static str, String), CacheEntry<V>>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache. A zero `ttl` disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Returns the entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a live entry, dropping it if it has expired.
    #[must_use]
    pub fn get(&self, operation: &'static str, key: &str) -> Option<V> {
        if self.ttl.is_zero() {
            return None;
        }
        let key = (operation, key.to_string());
        let live = self
            .entries
            .get(&key)
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone());
        if live.is_some() {
            return live;
        }
        // Only an entry that is still expired goes; a concurrent store wins.
        self.entries
            .remove_if(&key, |_, entry| entry.created_at.elapsed() >= self.ttl);
        None
    }

    /// Stores an entry, replacing any previous one and sweeping expired ones.
    pub fn insert(&self, operation: &'static str, key: &str, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.evict_expired();
        self.entries.insert(
            (operation, key.to_string()),
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// Returns the live entry or stores what `fetch` produces.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetch` fails with; nothing is stored then.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        operation: &'static str,
        key: &str,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(operation, key) {
            tracing::debug!(operation, key, "introspection cache hit");
            return Ok(value);
        }
        tracing::debug!(operation, key, "introspection cache miss");
        let value = fetch().await?;
        self.insert(operation, key, value.clone());
        Ok(value)
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries. Expired entries count until they are read
    /// or swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.created_at.elapsed() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let value: Result<Vec<String>, std::io::Error> = cache
                .get_or_try_insert_with("list_tables", "app", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![String::from("users")])
                })
                .await;
            assert_eq!(value.unwrap(), ["users"]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let failed: Result<u32, &str> = cache
            .get_or_try_insert_with("describe_table", "users", || async { Err("down") })
            .await;
        assert_eq!(failed, Err("down"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_are_per_operation() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("describe_table", "users", 1);
        cache.insert("list_tables", "users", 2);
        assert_eq!(cache.get("describe_table", "users"), Some(1));
        assert_eq!(cache.get("list_tables", "users"), Some(2));
        assert_eq!(cache.get("describe_table", "posts"), None);
    }

    #[test]
    fn test_expiry() {
        let cache = TtlCache::new(Duration::from_millis(20));
        cache.insert("describe_table", "users", 1);
        assert_eq!(cache.get("describe_table", "users"), Some(1));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("describe_table", "users"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_are_swept_on_insert() {
        let cache = TtlCache::new(Duration::from_millis(50));
        for table in 0..100 {
            cache.insert("describe_table", &format!("t{table}"), table);
        }
        assert_eq!(cache.len(), 100);
        std::thread::sleep(Duration::from_millis(100));

        cache.insert("describe_table", "fresh", 0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("describe_table", "fresh"), Some(0));
    }

    #[test]
    fn test_zero_ttl_disables() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("describe_table", "users", 1);
        assert_eq!(cache.get("describe_table", "users"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("describe_table", "users", 1);
        cache.clear();
        assert_eq!(cache.get("describe_table", "users"), None);
    }
}
