//! `RouteCache` — bounded LRU of route results.
//!
//! # Locking
//!
//! ```text
//! get         read lock: peek + clone the Arc
//!             then try_write: promote to most-recent (skipped if contended)
//! put         write lock: push, evicting the least-recent entry when full
//! invalidate  write lock
//! clear       write lock
//! ```
//!
//! Lookups never wait on each other.  Recency refresh is best-effort: a hit
//! that races a writer keeps its old position, which only affects which
//! entry is evicted next.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

use lru::LruCache;
use serde::Serialize;
use tracing::{debug, info};

use rr_core::{CacheConfig, CoreError, CoreResult, NodeId};
use rr_search::{Algorithm, RouteResult};

/// Identity of a cached route.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RouteKey {
    pub start: NodeId,
    pub end: NodeId,
    pub algorithm: Algorithm,
}

impl RouteKey {
    pub fn new(start: NodeId, end: NodeId, algorithm: Algorithm) -> Self {
        Self { start, end, algorithm }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}/{}", self.start, self.end, self.algorithm)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, 0 before the first lookup.
    pub hit_rate: f64,
}

pub struct RouteCache {
    entries: RwLock<LruCache<RouteKey, Arc<RouteResult>>>,
    hits:    AtomicU64,
    misses:  AtomicU64,
}

impl RouteCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            hits:    AtomicU64::new(0),
            misses:  AtomicU64::new(0),
        }
    }

    /// Validate `config` and build an empty cache.
    pub fn from_config(config: &CacheConfig) -> CoreResult<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.capacity)
            .ok_or_else(|| CoreError::Config("cache capacity must be non-zero".into()))?;
        Ok(Self::new(capacity))
    }

    fn read(&self) -> RwLockReadGuard<'_, LruCache<RouteKey, Arc<RouteResult>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LruCache<RouteKey, Arc<RouteResult>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached result for `key`, counting a hit or a miss.
    pub fn get(&self, key: &RouteKey) -> Option<Arc<RouteResult>> {
        let found = self.read().peek(key).cloned();
        let Some(result) = found else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };
        self.hits.fetch_add(1, Ordering::Relaxed);

        match self.entries.try_write() {
            Ok(mut entries) => {
                entries.promote(key);
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                poisoned.into_inner().promote(key);
            }
            Err(TryLockError::WouldBlock) => {}
        }
        Some(result)
    }

    /// Whether `key` is cached, without touching counters or recency.
    pub fn contains(&self, key: &RouteKey) -> bool {
        self.read().contains(key)
    }

    /// Cache `result` under `key`.  Failed results are ignored; returns
    /// whether the result was stored.
    pub fn put(&self, key: RouteKey, result: Arc<RouteResult>) -> bool {
        if !result.success {
            return false;
        }
        let evicted = self.write().push(key, result);
        if let Some((old, _)) = evicted.filter(|(old, _)| *old != key) {
            debug!(evicted = %old, inserted = %key, "route cache eviction");
        }
        true
    }

    pub fn invalidate(&self, key: &RouteKey) -> bool {
        self.write().pop(key).is_some()
    }

    /// Drop every entry whose route starts at, ends at, or passes through
    /// `node`.  Returns the number of entries removed.
    pub fn invalidate_node(&self, node: NodeId) -> usize {
        let mut entries = self.write();
        let stale: Vec<RouteKey> = entries
            .iter()
            .filter(|(key, result)| key.start == node || key.end == node || result.path.contains(&node))
            .map(|(key, _)| *key)
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        if !stale.is_empty() {
            debug!(%node, removed = stale.len(), "route cache node invalidation");
        }
        stale.len()
    }

    pub fn clear(&self) {
        let mut entries = self.write();
        let dropped = entries.len();
        entries.clear();
        info!(dropped, "route cache cleared");
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.read().cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        let (size, capacity) = {
            let entries = self.read();
            (entries.len(), entries.cap().get())
        };
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStats {
            size,
            capacity,
            hits,
            misses,
            hit_rate: if lookups == 0 { 0.0 } else { hits as f64 / lookups as f64 },
        }
    }

    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(CacheConfig::default().capacity).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCache").field("stats", &self.stats()).finish()
    }
}
