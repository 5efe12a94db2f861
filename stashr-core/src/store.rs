use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::StoreConfig;
use crate::entry::Entry;
use crate::sweeper::{Sweeper, SweeperState};

/// The key/value map and the single lock guarding it
pub(crate) type SharedMap = RwLock<HashMap<String, Entry>>;

/// Removes every entry that has expired as of a single instant.
///
/// Shared by the background sweeper and [`Store::sweep`].
pub(crate) fn remove_expired(data: &SharedMap) -> usize {
    let now = Instant::now();
    let mut data = data.write();
    let before = data.len();
    data.retain(|_, entry| !entry.is_expired_at(now));
    before - data.len()
}

struct StoreInner {
    data: Arc<SharedMap>,
    sweeper: Sweeper,
}

/// Thread-safe in-memory key-value store with TTL support
///
/// All entries live in one `HashMap` behind a single reader/writer lock.
/// Reads (`get` on a live key, `list`) share the lock; writes (`set`,
/// `delete`, sweeps, and the removal half of a lazy expiry) hold it
/// exclusively. Every operation is synchronous and returns owned values.
///
/// Expired entries are removed two ways: lazily when `get` or `delete`
/// touches them, and actively by a background sweeper that runs on the
/// configured interval until [`Store::stop`] is called or the last handle is
/// dropped.
///
/// Cloning a `Store` is cheap; clones share the same map and sweeper.
///
/// # Example
///
/// ```rust,no_run
/// use stashr_core::Store;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let store = Store::new();
///
///     store.set("session:42", "alice", Some(Duration::from_secs(300)));
///     assert_eq!(store.get("session:42").as_deref(), Some("alice"));
///
///     store.stop().await;
/// }
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Creates a new store with default configuration
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context. The store requires
    /// a runtime to spawn its background sweeper.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a new store with custom configuration
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn with_config(config: StoreConfig) -> Self {
        if tokio::runtime::Handle::try_current().is_err() {
            panic!(
                "stashr_core::Store requires a Tokio runtime. \
                 Create it from within a #[tokio::main] or #[tokio::test] context, \
                 or from code running on a Tokio runtime."
            );
        }

        let data = Arc::new(RwLock::new(HashMap::new()));
        let sweeper = Sweeper::new(config.sweep_interval);
        sweeper.start(Arc::clone(&data));

        Self {
            inner: Arc::new(StoreInner { data, sweeper }),
        }
    }

    /// Retrieves a value by key
    ///
    /// Returns `None` if the key doesn't exist or has expired. An expired
    /// entry is removed as a side effect.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let data = self.inner.data.read();
            match data.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired_at(now) => return Some(entry.value().to_owned()),
                Some(_) => {}
            }
        }

        // The read lock is gone before the write lock is taken, so the key
        // may have been overwritten in between.
        self.evict_if_expired(key);
        None
    }

    /// Removes `key` only if the entry stored under it right now is expired.
    fn evict_if_expired(&self, key: &str) -> bool {
        let mut data = self.inner.data.write();
        let now = Instant::now();
        if data.get(key).is_some_and(|entry| entry.is_expired_at(now)) {
            data.remove(key);
            true
        } else {
            false
        }
    }

    /// Stores a value, replacing any previous entry for the key
    ///
    /// A `ttl` of `None` or zero means the entry never expires; otherwise it
    /// expires `ttl` from now. The new value and deadline become visible
    /// together.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Option<Duration>) {
        let entry = Entry::with_ttl(value, ttl, Instant::now());
        self.inner.data.write().insert(key.into(), entry);
    }

    /// Stores a value that is already expired
    #[cfg(test)]
    fn set_expired(&self, key: impl Into<String>, value: impl Into<String>) {
        let entry = Entry::with_deadline(value, Instant::now());
        self.inner.data.write().insert(key.into(), entry);
    }

    /// Deletes a key from the store
    ///
    /// Returns `true` only if the key existed and had not expired. An
    /// expired entry is still removed, but reported as `false`.
    #[must_use = "returns whether a live key was deleted"]
    pub fn delete(&self, key: &str) -> bool {
        match self.inner.data.write().remove(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    /// Returns all keys that are live at the moment of the call
    ///
    /// The result is a snapshot in no particular order.
    pub fn list(&self) -> Vec<String> {
        let data = self.inner.data.read();
        let now = Instant::now();
        data.iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Removes all expired entries immediately
    ///
    /// Returns the number of entries removed. The background sweeper runs the
    /// same pass on its interval.
    pub fn sweep(&self) -> usize {
        remove_expired(&self.inner.data)
    }

    /// Returns the number of entries in the store (including expired ones not
    /// yet removed)
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.data.read().len()
    }

    /// Returns `true` if the store holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.data.read().is_empty()
    }

    /// Returns the current state of the background sweeper
    pub fn sweeper_state(&self) -> SweeperState {
        self.inner.sweeper.state()
    }

    /// Stops the background sweeper and waits for it to exit
    ///
    /// Calling this more than once, or from several tasks at once, is
    /// harmless; every call returns only after the sweeper has exited. Lazy
    /// expiry keeps working afterwards, but expired keys that nobody touches
    /// are no longer reclaimed.
    pub async fn stop(&self) {
        self.inner.sweeper.stop().await;
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
