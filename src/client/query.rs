//! Explicit query cache with staleness tracking and refetch cancellation.
//!
//! The cache holds the locally cached todo collection keyed by a query
//! identifier. Background refetches are tracked with an abort handle and
//! an epoch counter: a mutation bumps the epoch and aborts the in-flight
//! refetch under a single lock, so a stale refetch response can never
//! overwrite a later optimistic write, even if the abort arrives after
//! the response was already produced.

use crate::libs::todo::Todo;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::AbortHandle;

/// Query identifier of the todo collection.
pub const TODOS_KEY: &str = "todos";

/// Staleness window after which a background refetch is allowed.
pub const STALE_TIME: Duration = Duration::from_secs(5 * 60);

#[derive(Default)]
struct Entry {
    todos: Vec<Todo>,
    fetched_at: Option<Instant>,
    epoch: u64,
    inflight: Option<AbortHandle>,
}

/// Shared cache of query results.
///
/// Cloning is cheap; clones share the same state. No global singleton is
/// involved, the cache is passed to whoever needs it.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached collection, if any.
    pub fn get(&self, key: &str) -> Option<Vec<Todo>> {
        self.inner.lock().get(key).map(|entry| entry.todos.clone())
    }

    /// Writes the collection without touching freshness. This is the write
    /// used by optimistic updates and rollbacks.
    pub fn set(&self, key: &str, todos: Vec<Todo>) {
        let mut inner = self.inner.lock();
        let entry = inner.entry(key.to_string()).or_default();
        entry.todos = todos;
    }

    /// Seeds the cache with server-provided data and marks it fresh.
    pub fn hydrate(&self, key: &str, todos: Vec<Todo>) {
        let mut inner = self.inner.lock();
        let entry = inner.entry(key.to_string()).or_default();
        entry.todos = todos;
        entry.fetched_at = Some(Instant::now());
    }

    /// Whether the entry is older than the given window (or never fetched).
    pub fn is_stale(&self, key: &str, window: Duration) -> bool {
        let inner = self.inner.lock();
        match inner.get(key).and_then(|entry| entry.fetched_at) {
            Some(fetched_at) => fetched_at.elapsed() > window,
            None => true,
        }
    }

    /// Starts a refetch and returns the epoch it belongs to.
    pub fn begin_refetch(&self, key: &str) -> u64 {
        let mut inner = self.inner.lock();
        inner.entry(key.to_string()).or_default().epoch
    }

    /// Registers the abort handle of a spawned refetch task.
    ///
    /// If the epoch already moved on (a mutation started between spawn and
    /// registration) the task is aborted immediately.
    pub fn register_inflight(&self, key: &str, epoch: u64, handle: AbortHandle) {
        let mut inner = self.inner.lock();
        let entry = inner.entry(key.to_string()).or_default();
        if entry.epoch == epoch {
            entry.inflight = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Applies a refetch result. Returns `false` (and discards the data)
    /// when the epoch is no longer current.
    pub fn complete_refetch(&self, key: &str, epoch: u64, todos: Vec<Todo>) -> bool {
        let mut inner = self.inner.lock();
        let entry = inner.entry(key.to_string()).or_default();
        if entry.epoch != epoch {
            return false;
        }
        entry.todos = todos;
        entry.fetched_at = Some(Instant::now());
        entry.inflight = None;
        true
    }

    /// Marks the entry stale so the next revalidation refetches.
    pub fn invalidate(&self, key: &str) {
        let mut inner = self.inner.lock();
        let entry = inner.entry(key.to_string()).or_default();
        entry.fetched_at = None;
    }

    /// Cancels any in-flight refetch for the key.
    pub fn cancel_inflight(&self, key: &str) {
        let mut inner = self.inner.lock();
        let entry = inner.entry(key.to_string()).or_default();
        entry.epoch += 1;
        if let Some(handle) = entry.inflight.take() {
            handle.abort();
        }
    }

    /// The snapshot-and-cancel step of the optimistic protocol.
    ///
    /// Under a single lock: aborts any in-flight refetch, invalidates its
    /// epoch and returns a snapshot of the current collection for rollback.
    pub fn prepare_mutation(&self, key: &str) -> Vec<Todo> {
        let mut inner = self.inner.lock();
        let entry = inner.entry(key.to_string()).or_default();
        entry.epoch += 1;
        if let Some(handle) = entry.inflight.take() {
            handle.abort();
        }
        entry.todos.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, text: &str) -> Todo {
        Todo {
            id,
            text: text.to_string(),
            completed: false,
        }
    }

    #[test]
    fn hydrated_entry_is_fresh_then_goes_stale() {
        let cache = QueryCache::new();
        assert!(cache.is_stale(TODOS_KEY, STALE_TIME));

        cache.hydrate(TODOS_KEY, vec![todo(1, "a")]);
        assert!(!cache.is_stale(TODOS_KEY, STALE_TIME));
        assert!(cache.is_stale(TODOS_KEY, Duration::ZERO));
    }

    #[test]
    fn stale_refetch_result_is_discarded_after_mutation() {
        let cache = QueryCache::new();
        cache.hydrate(TODOS_KEY, vec![todo(1, "a"), todo(3, "c")]);

        let epoch = cache.begin_refetch(TODOS_KEY);

        // A mutation starts: snapshot-and-cancel bumps the epoch and the
        // optimistic write removes id 3.
        let snapshot = cache.prepare_mutation(TODOS_KEY);
        assert_eq!(snapshot.len(), 2);
        cache.set(TODOS_KEY, vec![todo(1, "a")]);

        // The refetch response from before the mutation must not land.
        let applied = cache.complete_refetch(TODOS_KEY, epoch, vec![todo(1, "a"), todo(3, "c")]);
        assert!(!applied);
        assert_eq!(cache.get(TODOS_KEY).unwrap().len(), 1);
    }

    #[test]
    fn current_refetch_result_is_applied() {
        let cache = QueryCache::new();
        let epoch = cache.begin_refetch(TODOS_KEY);
        assert!(cache.complete_refetch(TODOS_KEY, epoch, vec![todo(1, "a")]));
        assert_eq!(cache.get(TODOS_KEY).unwrap().len(), 1);
        assert!(!cache.is_stale(TODOS_KEY, STALE_TIME));
    }

    #[test]
    fn set_preserves_staleness() {
        let cache = QueryCache::new();
        cache.set(TODOS_KEY, vec![todo(1, "a")]);
        // A plain write is not a fetch; the entry is still stale.
        assert!(cache.is_stale(TODOS_KEY, STALE_TIME));
    }
}
