//! Keyed cache with idle-timeout eviction.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Entry in the cache with activity tracking.
struct SourceEntry<V> {
    value: V,
    last_activity: Instant,
}

/// In-memory cache of per-channel sources.
///
/// Entries are evicted once they have been idle for the configured
/// timeout. Eviction happens in [`sweep`](SourceCache::sweep), which callers
/// run before each lookup; there is no background task.
pub struct SourceCache<K, V> {
    entries: HashMap<K, SourceEntry<V>>,
    idle_timeout: Duration,
}

impl<K, V> SourceCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Create an empty cache.
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            idle_timeout,
        }
    }

    /// Remove entries idle for at least the timeout. Returns how many were removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let timeout = self.idle_timeout;

        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_activity) < timeout);

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Evicted {} idle sources", removed);
        }
        removed
    }

    /// Look up an entry and record activity on it.
    pub fn touch(&mut self, key: &K, now: Instant) -> Option<&mut V> {
        self.entries.get_mut(key).map(|entry| {
            entry.last_activity = now;
            &mut entry.value
        })
    }

    /// Insert a fresh entry, replacing any previous one.
    pub fn insert(&mut self, key: K, value: V, now: Instant) -> &mut V {
        debug!("Caching new source {:?}", key);
        let entry = SourceEntry {
            value,
            last_activity: now,
        };

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(entry);
                &mut occupied.into_mut().value
            }
            Entry::Vacant(vacant) => &mut vacant.insert(entry).value,
        }
    }

    /// Look up an entry without recording activity.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Last recorded activity for an entry.
    pub fn last_activity(&self, key: &K) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.last_activity)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
