//! Bounded cache of built trees keyed by (realm, tree name).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::tree::logging::log_tree_evicted;
use crate::tree::Tree;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TreeKey {
    realm: String,
    name: String,
}

impl TreeKey {
    fn new(realm: &str, name: &str) -> Self {
        Self {
            realm: realm.to_string(),
            name: name.to_string(),
        }
    }
}

struct CacheEntry {
    tree: Arc<Tree>,
    inserted: u64,
}

/// Concurrent cache of built trees.
///
/// Holds at most `capacity` trees; inserting a new key into a full cache evicts the
/// entry inserted longest ago. The bound is soft under concurrent inserts of
/// different keys: the map may hold a few extra trees until each inserter has
/// trimmed, after which it is back within capacity. A capacity of zero disables
/// caching. Entries are
/// dropped explicitly with [`invalidate`](Self::invalidate) when configuration changes.
pub struct TreeCache {
    entries: DashMap<TreeKey, CacheEntry>,
    capacity: usize,
    clock: AtomicU64,
}

impl TreeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
            clock: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, realm: &str, name: &str) -> Option<Arc<Tree>> {
        self.entries
            .get(&TreeKey::new(realm, name))
            .map(|e| Arc::clone(&e.tree))
    }

    /// Caches `tree` under its own realm and name, evicting the oldest entry when full.
    pub fn insert(&self, tree: Arc<Tree>) {
        if self.capacity == 0 {
            return;
        }
        let key = TreeKey::new(tree.realm(), tree.name());
        let inserted = self.clock.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(key, CacheEntry { tree, inserted });
        // Every inserter trims after itself, so racing inserts settle back to capacity.
        while self.entries.len() > self.capacity {
            if !self.evict_oldest() {
                break;
            }
        }
    }

    /// Drops the cached tree `name` in `realm`. Returns whether it was cached.
    pub fn invalidate(&self, realm: &str, name: &str) -> bool {
        self.entries.remove(&TreeKey::new(realm, name)).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().inserted)
            .map(|e| e.key().clone());
        match oldest {
            Some(key) => {
                // Another inserter may have removed it first; the caller re-checks len.
                if self.entries.remove(&key).is_some() {
                    log_tree_evicted(&key.realm, &key.name);
                }
                true
            }
            None => false,
        }
    }
}
