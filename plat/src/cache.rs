//! Async memoized cache with in-flight deduplication.
//!
//! [`ResultCache`] backs every network resolution in the engine: pin
//! summaries, boundary details, geocode labels, membership records, and
//! plan entitlements each get one cache keyed by opaque strings.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::{future::Future, sync::Arc};

type SharedFetch<T> = Shared<BoxFuture<'static, Option<T>>>;

/// Memoizing resolver with at most one outstanding fetch per key.
///
/// `resolve` returns a cached value immediately, joins an in-flight fetch
/// for the same key, or starts a new one. Fetches that yield `None`
/// (not found or failed) leave the key absent so a later call can retry;
/// only successful values are stored. Entries live for the lifetime of the
/// cache; `invalidate` and `clear` let the owner drop state explicitly, for
/// example when the host switches map context.
pub struct ResultCache<T> {
    inner: Arc<Mutex<CacheInner<T>>>,
}

struct CacheInner<T> {
    values: FxHashMap<String, T>,
    pending: FxHashMap<String, SharedFetch<T>>,
}

impl<T> Default for ResultCache<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                values: FxHashMap::default(),
                pending: FxHashMap::default(),
            })),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ResultCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `key`, invoking `fetch` only when the key is cold.
    ///
    /// Concurrent callers for the same key share a single fetch: the
    /// pending future is stored in the cache entry, so an abandoned caller
    /// neither cancels the fetch nor strands the bookkeeping. The shared
    /// future itself removes the pending marker and stores a successful
    /// value, whichever caller drives it to completion.
    pub async fn resolve<F, Fut>(&self, key: &str, fetch: F) -> Option<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        let shared = {
            let mut inner = self.inner.lock();
            if let Some(value) = inner.values.get(key) {
                return Some(value.clone());
            }
            if let Some(pending) = inner.pending.get(key) {
                pending.clone()
            } else {
                let state = Arc::clone(&self.inner);
                let owned_key = key.to_string();
                let fut = async move {
                    let result = fetch().await;
                    let mut inner = state.lock();
                    inner.pending.remove(&owned_key);
                    if let Some(value) = &result {
                        inner.values.insert(owned_key, value.clone());
                    }
                    result
                }
                .boxed()
                .shared();
                inner.pending.insert(key.to_string(), fut.clone());
                fut
            }
        };

        shared.await
    }

    /// Stored value for `key`, if any. Never joins a pending fetch.
    pub fn get(&self, key: &str) -> Option<T> {
        self.inner.lock().values.get(key).cloned()
    }

    /// Store a value directly, replacing any existing entry.
    pub fn insert(&self, key: impl Into<String>, value: T) {
        self.inner.lock().values.insert(key.into(), value);
    }

    /// Drop the stored value for `key`. A fetch already in flight is
    /// unaffected and will store its result when it completes.
    pub fn invalidate(&self, key: &str) {
        self.inner.lock().values.remove(key);
    }

    /// Drop every stored value.
    pub fn clear(&self) {
        self.inner.lock().values.clear();
    }

    /// Number of stored values (pending fetches excluded).
    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().values.is_empty()
    }

    /// Whether a fetch for `key` is currently in flight.
    pub fn is_pending(&self, key: &str) -> bool {
        self.inner.lock().pending.contains_key(key)
    }
}
