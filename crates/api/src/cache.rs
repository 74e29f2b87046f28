//! Process-local cache for by-id creation reads.
//!
//! Creations are immutable once written, so entries never need invalidating;
//! the cache only bounds memory with FIFO eviction. State is lost on restart,
//! which is acceptable for a warm-read memo.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use monument_core::types::DbId;
use monument_db::models::creation::Creation;

/// Bounded FIFO cache of full creation rows keyed by id.
///
/// A capacity of zero disables caching entirely.
pub struct ImageCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    map: HashMap<DbId, Creation>,
    order: VecDeque<DbId>,
}

impl ImageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Look up a cached creation.
    pub fn get(&self, id: DbId) -> Option<Creation> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.map.get(&id).cloned()
    }

    /// Store a creation, evicting the oldest entry when full.
    pub fn insert(&self, creation: Creation) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if inner.map.contains_key(&creation.id) {
            inner.map.insert(creation.id, creation);
            return;
        }

        while inner.map.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(evicted) => {
                    inner.map.remove(&evicted);
                }
                None => break,
            }
        }

        inner.order.push_back(creation.id);
        inner.map.insert(creation.id, creation);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
