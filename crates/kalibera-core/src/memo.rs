//! Memo tables for pure functions of immutable data
//!
//! A [`Memo`] maps an argument key to a computed value, populated lazily on
//! first request. The owning data never changes, so entries are never
//! invalidated.
//!
//! # Thread Safety
//!
//! Storage is a `Mutex<HashMap>`. The computation runs with the lock released,
//! so two threads racing on the same key may both compute it; both results are
//! identical and the first insert wins. Hit and miss counters are atomics and
//! never need the lock.

use crate::{Error, Result};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::trace;

/// Memo table statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoStats {
    /// Number of lookups answered from the table
    pub hits: usize,
    /// Number of lookups that had to compute
    pub misses: usize,
    /// Number of entries currently stored
    pub entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

/// Lazily populated, thread-safe memo table
pub struct Memo<K, V> {
    name: &'static str,
    storage: Mutex<HashMap<K, V>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Copy,
{
    /// Create an empty memo table; `name` labels trace events and errors
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            storage: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Return the stored value for `key`, computing and storing it on a miss
    ///
    /// Errors from `compute` are returned and nothing is stored.
    pub fn get_or_try_compute<F>(&self, key: K, compute: F) -> Result<V>
    where
        F: FnOnce(&K) -> Result<V>,
    {
        {
            let storage = self.storage.lock().map_err(|_| Error::poisoned(self.name))?;
            if let Some(value) = storage.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(*value);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(memo = self.name, ?key, "memo miss");
        let value = compute(&key)?;

        let mut storage = self.storage.lock().map_err(|_| Error::poisoned(self.name))?;
        Ok(*storage.entry(key).or_insert(value))
    }

    /// Current statistics
    pub fn stats(&self) -> MemoStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let entries = self.storage.lock().map(|s| s.len()).unwrap_or(0);
        let total = hits + misses;
        MemoStats {
            hits,
            misses,
            entries,
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}

impl<K, V> std::fmt::Debug for Memo<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("name", &self.name)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}
