//! Counter store adapter.
//!
//! The engine never talks to a backend directly; it goes through the
//! narrow [`CounterStore`] trait. Correctness of crossing detection rests
//! entirely on the atomicity of `increment`/`decrement` — an implementation
//! must use its backend's native atomic-counter primitive (or equivalent
//! mutual exclusion), never read-then-write.
//!
//! # Rules for implementations
//!
//! - A key that has never been written reads as 0; that is first-use
//!   semantics, never an error.
//! - Transport failure or timeout maps to `StoreUnavailable`. No internal
//!   retry — retry policy belongs to the adapter's configuration or the
//!   host.
//!
//! [`MemoryStore`] is the bundled process-local backend; a networked
//! key-value store with atomic counters implements the same trait.

use crate::errors::{EngineError, EngineResult};
use crate::key::CounterKey;
use std::collections::HashMap;
use std::sync::Mutex;

/// Narrow interface the engine consumes against the external durable store.
pub trait CounterStore: Send + Sync {
    /// Atomically add 1 to the counter at `key` and return the new value
    fn increment(&self, key: &CounterKey) -> EngineResult<i64>;

    /// Atomically subtract 1 from the counter at `key` and return the new value
    fn decrement(&self, key: &CounterKey) -> EngineResult<i64>;

    /// Point read; 0 if the key has never been written
    fn get(&self, key: &CounterKey) -> EngineResult<i64>;
}

/// Process-local counter store.
///
/// All counters live in one mutex-guarded map, so each increment/decrement
/// is an atomic read-modify-write with respect to every other caller
/// sharing the store. Suitable for tests and single-process hosts; shared
/// across threads via `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn with_counters<T>(&self, f: impl FnOnce(&mut HashMap<String, i64>) -> T) -> EngineResult<T> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| EngineError::store_unavailable("Counter store mutex poisoned"))?;
        Ok(f(&mut counters))
    }
}

impl CounterStore for MemoryStore {
    fn increment(&self, key: &CounterKey) -> EngineResult<i64> {
        self.with_counters(|counters| {
            let value = counters.entry(key.as_str().to_string()).or_insert(0);
            *value += 1;
            *value
        })
    }

    fn decrement(&self, key: &CounterKey) -> EngineResult<i64> {
        self.with_counters(|counters| {
            let value = counters.entry(key.as_str().to_string()).or_insert(0);
            *value -= 1;
            *value
        })
    }

    fn get(&self, key: &CounterKey) -> EngineResult<i64> {
        self.with_counters(|counters| counters.get(key.as_str()).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn key(name: &str) -> CounterKey {
        CounterKey::build("test", "a1", name).unwrap()
    }

    #[test]
    fn test_unwritten_key_reads_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.get(&key("nothing")).unwrap(), 0);
    }

    #[test]
    fn test_increment_decrement() {
        let store = MemoryStore::new();
        let k = key("steps");

        assert_eq!(store.increment(&k).unwrap(), 1);
        assert_eq!(store.increment(&k).unwrap(), 2);
        assert_eq!(store.decrement(&k).unwrap(), 1);
        assert_eq!(store.get(&k).unwrap(), 1);
    }

    #[test]
    fn test_decrement_below_zero() {
        let store = MemoryStore::new();
        let k = key("corrections");
        assert_eq!(store.decrement(&k).unwrap(), -1);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let k = key("hammered");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let k = k.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        store.increment(&k).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.get(&k).unwrap(), 2000);
    }

    #[test]
    fn test_concurrent_increments_return_distinct_values() {
        let store = Arc::new(MemoryStore::new());
        let k = key("ordered");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let k = k.clone();
                thread::spawn(move || (0..100).map(|_| store.increment(&k).unwrap()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        let expected: Vec<i64> = (1..=400).collect();
        assert_eq!(all, expected);
    }
}
