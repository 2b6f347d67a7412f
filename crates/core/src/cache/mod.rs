//! Timestamped value cache keyed by arbitrary keys.
//!
//! This is deliberately not an LRU: lookups never refresh an entry's
//! recency, only `set_value` does. Eviction is always an explicit bulk
//! operation driven by the owner, either by age or by a keep-set. The
//! cache belongs to a single owner and carries no interior locking.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct OrderedCache<Key, Value>
where
    Key: Eq + Hash + Clone,
{
    entries: HashMap<Key, (Value, DateTime<Utc>)>,
}

impl<Key, Value> OrderedCache<Key, Value>
where
    Key: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert or replace the value for `key`, stamped with `dated`.
    /// Replacing also resets the entry's recency.
    pub fn set_value(&mut self, value: Value, key: Key, dated: DateTime<Utc>) {
        self.entries.insert(key, (value, dated));
    }

    /// Look up a value without touching its recency.
    pub fn find_by(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key).map(|(value, _)| value)
    }

    /// Drop every entry stamped strictly before `cutoff`.
    pub fn remove_older_than(&mut self, cutoff: DateTime<Utc>) {
        self.entries.retain(|_, (_, dated)| *dated >= cutoff);
    }

    /// Drop every entry whose key is not in `keys`, returning the
    /// evicted values.
    pub fn remove_not_matching(&mut self, keys: &HashSet<Key>) -> Vec<Value> {
        let stale: Vec<Key> = self
            .entries
            .keys()
            .filter(|key| !keys.contains(*key))
            .cloned()
            .collect();
        stale
            .into_iter()
            .filter_map(|key| self.entries.remove(&key).map(|(value, _)| value))
            .collect()
    }

    /// Remove a single entry, returning its value if present.
    pub fn remove_value(&mut self, key: &Key) -> Option<Value> {
        self.entries.remove(key).map(|(value, _)| value)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_set_and_find() {
        let mut cache = OrderedCache::new();
        cache.set_value("hello".to_string(), 1u32, Utc::now());
        assert_eq!(cache.find_by(&1), Some(&"hello".to_string()));
        assert_eq!(cache.find_by(&2), None);
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_upsert_replaces_value_and_timestamp() {
        let mut cache = OrderedCache::new();
        let old = Utc::now() - Duration::hours(2);
        cache.set_value("old".to_string(), 1u32, old);
        cache.set_value("new".to_string(), 1u32, Utc::now());
        assert_eq!(cache.find_by(&1), Some(&"new".to_string()));
        assert_eq!(cache.count(), 1);

        // the refreshed timestamp survives an age-based sweep
        cache.remove_older_than(Utc::now() - Duration::hours(1));
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_remove_older_than_keeps_recent() {
        let mut cache = OrderedCache::new();
        cache.set_value("old".to_string(), 1u32, Utc::now() - Duration::hours(2));
        cache.set_value("new".to_string(), 2u32, Utc::now());
        cache.remove_older_than(Utc::now() - Duration::hours(1));
        assert_eq!(cache.count(), 1);
        assert_eq!(cache.find_by(&2), Some(&"new".to_string()));
    }

    #[test]
    fn test_remove_older_than_can_evict_everything() {
        let mut cache = OrderedCache::new();
        cache.set_value("a".to_string(), 1u32, Utc::now() - Duration::minutes(10));
        cache.set_value("b".to_string(), 2u32, Utc::now() - Duration::minutes(5));
        cache.remove_older_than(Utc::now());
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_lookup_does_not_refresh_recency() {
        let mut cache = OrderedCache::new();
        cache.set_value("value".to_string(), 1u32, Utc::now() - Duration::hours(2));
        assert!(cache.find_by(&1).is_some());
        cache.remove_older_than(Utc::now() - Duration::hours(1));
        assert_eq!(cache.count(), 0);
    }

    #[test]
    fn test_remove_not_matching() {
        let mut cache = OrderedCache::new();
        cache.set_value("one".to_string(), 1u32, Utc::now());
        cache.set_value("two".to_string(), 2u32, Utc::now());
        cache.set_value("three".to_string(), 3u32, Utc::now());

        let keep: HashSet<u32> = [2].into_iter().collect();
        let mut evicted = cache.remove_not_matching(&keep);
        evicted.sort();
        assert_eq!(evicted, vec!["one".to_string(), "three".to_string()]);
        assert_eq!(cache.count(), 1);
        assert!(cache.find_by(&2).is_some());
    }

    #[test]
    fn test_remove_value() {
        let mut cache = OrderedCache::new();
        cache.set_value("value".to_string(), 1u32, Utc::now());
        assert_eq!(cache.remove_value(&1), Some("value".to_string()));
        assert_eq!(cache.remove_value(&1), None);
        assert_eq!(cache.count(), 0);
    }
}
