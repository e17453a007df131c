// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A keyed, in-memory query cache.
//!
//! Each key owns one entry holding the last fetched value, the last error and
//! at most one in-flight fetch. Concurrent requests for the same key share the
//! in-flight fetch, so one round trip serves every waiter.
//!
//! # Staleness
//!
//! A value older than `stale_after` is still served immediately, and a
//! background refetch is started (stale-while-revalidate). A failed refetch
//! keeps the old value.
//!
//! # Generations
//!
//! Every fetch started for a key takes the entry's next generation number.
//! A completion is only written if its generation is still current, so a
//! superseded fetch can never overwrite a newer result.

use crate::error::FetchError;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, warn};

type SharedFetch<V> = Shared<BoxFuture<'static, Result<Arc<V>, FetchError>>>;

/// What a caller sees for one key.
#[derive(Debug)]
pub enum QueryState<V> {
    /// Never requested.
    Idle,
    /// First fetch in flight, nothing to show yet.
    Loading,
    /// The last fetch failed and there is no value to fall back on.
    Failed(FetchError),
    /// A value is available.
    Ready {
        /// The cached value.
        data: Arc<V>,
        /// A background refetch is in flight.
        refreshing: bool,
        /// The value is older than the staleness window.
        stale: bool,
    },
}

impl<V> QueryState<V> {
    /// Returns the value, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Arc<V>> {
        match self {
            Self::Ready { data, .. } => Some(data),
            Self::Idle | Self::Loading | Self::Failed(_) => None,
        }
    }

    /// Returns the error, if the entry failed.
    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Idle | Self::Loading | Self::Ready { .. } => None,
        }
    }

    /// Whether the caller should show a loading indicator.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl<V> Clone for QueryState<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Failed(err) => Self::Failed(err.clone()),
            Self::Ready {
                data,
                refreshing,
                stale,
            } => Self::Ready {
                data: Arc::clone(data),
                refreshing: *refreshing,
                stale: *stale,
            },
        }
    }
}

/// A state change of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent<K> {
    /// A fetch started.
    Loading {
        /// The entry key.
        key: K,
    },
    /// A fetch completed and the entry holds a new value.
    Ready {
        /// The entry key.
        key: K,
    },
    /// A fetch failed.
    Failed {
        /// The entry key.
        key: K,
        /// Why it failed.
        error: FetchError,
    },
}

impl<K> CacheEvent<K> {
    /// The key this event concerns.
    #[must_use]
    pub const fn key(&self) -> &K {
        match self {
            Self::Loading { key } | Self::Ready { key } | Self::Failed { key, .. } => key,
        }
    }
}

struct Entry<V> {
    data: Option<Arc<V>>,
    fetched_at: Option<Instant>,
    error: Option<FetchError>,
    invalidated: bool,
    generation: u64,
    in_flight: Option<SharedFetch<V>>,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            fetched_at: None,
            error: None,
            invalidated: false,
            generation: 0,
            in_flight: None,
        }
    }
}

impl<V> Entry<V> {
    fn is_stale(&self, stale_after: Duration) -> bool {
        self.invalidated
            || self
                .fetched_at
                .is_none_or(|at| at.elapsed() >= stale_after)
    }

    fn state(&self, stale_after: Duration) -> QueryState<V> {
        match (&self.data, &self.error) {
            (Some(data), _) => QueryState::Ready {
                data: Arc::clone(data),
                refreshing: self.in_flight.is_some(),
                stale: self.is_stale(stale_after),
            },
            (None, _) if self.in_flight.is_some() => QueryState::Loading,
            (None, Some(err)) => QueryState::Failed(err.clone()),
            (None, None) => QueryState::Idle,
        }
    }
}

struct Inner<K, V> {
    name: &'static str,
    stale_after: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
    events: broadcast::Sender<CacheEvent<K>>,
}

impl<K, V> Inner<K, V>
where
    K: Clone + Eq + Hash + Display + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: CacheEvent<K>) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Records the outcome of the fetch started with `generation`.
    fn complete(&self, key: &K, generation: u64, result: &Result<Arc<V>, FetchError>) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            warn!(cache = self.name, %key, "Dropping result for evicted entry");
            return;
        };
        if entry.generation != generation {
            warn!(
                cache = self.name,
                %key,
                generation,
                current = entry.generation,
                "Dropping superseded fetch result"
            );
            return;
        }
        entry.in_flight = None;

        let event: CacheEvent<K> = match result {
            Ok(data) => {
                entry.data = Some(Arc::clone(data));
                entry.fetched_at = Some(Instant::now());
                entry.error = None;
                entry.invalidated = false;
                debug!(cache = self.name, %key, "Fetch completed");
                CacheEvent::Ready { key: key.clone() }
            }
            Err(err) => {
                if entry.data.is_some() {
                    // Keep serving the old value; the next access retries
                    entry.invalidated = true;
                    warn!(
                        cache = self.name,
                        %key,
                        error = %err,
                        "Revalidation failed, serving stale value"
                    );
                } else {
                    entry.error = Some(err.clone());
                    error!(cache = self.name, %key, error = %err, "Fetch failed");
                }
                CacheEvent::Failed {
                    key: key.clone(),
                    error: err.clone(),
                }
            }
        };
        drop(entries);
        self.notify(event);
    }
}

/// A keyed query cache. Cloning yields another handle to the same cache.
pub struct QueryCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Eq + Hash + Display + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Creates an empty cache that publishes its events on `events`.
    ///
    /// # Arguments
    ///
    /// * `name` - Cache name used in log fields
    /// * `stale_after` - Age after which a value is revalidated on access
    /// * `events` - Channel receiving every entry state change
    #[must_use]
    pub fn new(
        name: &'static str,
        stale_after: Duration,
        events: broadcast::Sender<CacheEvent<K>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                stale_after,
                entries: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    /// Subscribes to entry state changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent<K>> {
        self.inner.events.subscribe()
    }

    /// Returns the current state for `key` without starting a fetch.
    #[must_use]
    pub fn peek(&self, key: &K) -> QueryState<V> {
        self.inner
            .lock()
            .get(key)
            .map_or(QueryState::Idle, |entry| entry.state(self.inner.stale_after))
    }

    /// Returns the current state for `key`, starting a fetch if the key has
    /// never been fetched or its value is stale.
    ///
    /// A failed entry is not refetched; use [`Self::retry`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime and a fetch has to start.
    pub fn request<F, Fut>(&self, key: &K, fetcher: F) -> QueryState<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let mut entries = self.inner.lock();
        let entry: &mut Entry<V> = entries.entry(key.clone()).or_default();

        let needs_fetch: bool = entry.in_flight.is_none()
            && match (&entry.data, &entry.error) {
                (Some(_), _) => entry.is_stale(self.inner.stale_after),
                (None, Some(_)) => false,
                (None, None) => true,
            };
        if needs_fetch {
            if entry.data.is_some() {
                debug!(cache = self.inner.name, %key, "Serving stale value, revalidating");
            }
            entry.in_flight = Some(self.start_fetch(key, entry, fetcher));
        } else if entry.in_flight.is_some() {
            debug!(cache = self.inner.name, %key, "Joining in-flight fetch");
        }
        entry.state(self.inner.stale_after)
    }

    /// Resolves the value for `key`.
    ///
    /// Returns a fresh cached value immediately, a stale one immediately
    /// while revalidating in the background, or waits on the in-flight fetch
    /// (starting one if needed). Callers waiting on the same key share a
    /// single fetch.
    ///
    /// # Errors
    ///
    /// Returns the entry's error if it failed and has no value, or the error
    /// of the fetch this call waited on.
    pub async fn fetch<F, Fut>(&self, key: &K, fetcher: F) -> Result<Arc<V>, FetchError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let pending: SharedFetch<V> = {
            let mut entries = self.inner.lock();
            let entry: &mut Entry<V> = entries.entry(key.clone()).or_default();
            let stale: bool = entry.is_stale(self.inner.stale_after);

            if let Some(data) = entry.data.clone() {
                if stale && entry.in_flight.is_none() {
                    entry.in_flight = Some(self.start_fetch(key, entry, fetcher));
                }
                return Ok(data);
            }
            if let Some(in_flight) = &entry.in_flight {
                debug!(cache = self.inner.name, %key, "Joining in-flight fetch");
                in_flight.clone()
            } else if let Some(err) = &entry.error {
                return Err(err.clone());
            } else {
                let started: SharedFetch<V> = self.start_fetch(key, entry, fetcher);
                entry.in_flight = Some(started.clone());
                started
            }
        };
        pending.await
    }

    /// Re-issues the fetch for `key`, clearing a recorded failure.
    ///
    /// Joins the in-flight fetch instead if there is one.
    pub fn retry<F, Fut>(&self, key: &K, fetcher: F) -> QueryState<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let mut entries = self.inner.lock();
        let entry: &mut Entry<V> = entries.entry(key.clone()).or_default();
        if entry.in_flight.is_none() {
            debug!(cache = self.inner.name, %key, "Retrying fetch");
            entry.error = None;
            entry.in_flight = Some(self.start_fetch(key, entry, fetcher));
        }
        entry.state(self.inner.stale_after)
    }

    /// Starts a new fetch for `key` even if one is in flight.
    ///
    /// The in-flight fetch is superseded: its waiters still receive its
    /// result, but the result is not written to the cache. Use this when the
    /// in-flight fetch may be hanging.
    pub fn refetch<F, Fut>(&self, key: &K, fetcher: F) -> QueryState<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let mut entries = self.inner.lock();
        let entry: &mut Entry<V> = entries.entry(key.clone()).or_default();
        if entry.in_flight.is_some() {
            debug!(cache = self.inner.name, %key, "Superseding in-flight fetch");
        }
        entry.error = None;
        entry.in_flight = Some(self.start_fetch(key, entry, fetcher));
        entry.state(self.inner.stale_after)
    }

    /// Starts a fetch for `key` under the entry's next generation. The caller
    /// installs the returned future as the entry's in-flight fetch while
    /// still holding the lock.
    fn start_fetch<F, Fut>(&self, key: &K, entry: &mut Entry<V>, fetcher: F) -> SharedFetch<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        entry.generation += 1;
        let generation: u64 = entry.generation;
        let inner: Arc<Inner<K, V>> = Arc::clone(&self.inner);
        let owned_key: K = key.clone();

        let shared: SharedFetch<V> = async move {
            let result: Result<Arc<V>, FetchError> = fetcher().await.map(Arc::new);
            inner.complete(&owned_key, generation, &result);
            result
        }
        .boxed()
        .shared();

        // Drive the fetch even if every waiter goes away
        tokio::spawn(shared.clone());

        debug!(cache = self.inner.name, %key, generation, "Fetch started");
        self.inner.notify(CacheEvent::Loading { key: key.clone() });
        shared
    }
}
