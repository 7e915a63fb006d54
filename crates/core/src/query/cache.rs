//! Keyed snapshot cache with request de-duplication
//!
//! Each [`ResourceKey`] maps to one entry holding the last snapshot, a stale
//! flag, the last fetch error and at most one in-flight fetch. Concurrent
//! readers of a key share that fetch through a [`Shared`] future, so they
//! all observe the same `Arc` snapshot.
//!
//! Invalidation bumps a per-entry generation. Reads only join a fetch that
//! started in the current generation; an older one is superseded and its
//! result reaches only the readers already waiting on it. A read issued
//! after `invalidate` returns therefore always goes back to the remote store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dealflow_domain::{Company, Contact, CrmError, DashboardReport, Deal, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::key::{Resource, ResourceKey};
use super::ports::ResourceSource;

const EVENT_CHANNEL_CAPACITY: usize = 64;

type SharedFetch = Shared<BoxFuture<'static, Result<Resource>>>;

/// Snapshot of a cached resource as seen by one reader.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    /// Last known snapshot. Kept after a failed refetch.
    pub data: Option<T>,
    /// A fetch for this key is outstanding.
    pub is_loading: bool,
    /// Error of the most recent fetch, if it failed.
    pub error: Option<CrmError>,
}

impl<T> QueryState<T> {
    fn ready(data: T) -> Self {
        Self { data: Some(data), is_loading: false, error: None }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        QueryState { data: self.data.map(f), is_loading: self.is_loading, error: self.error }
    }

    /// Data if any snapshot exists, otherwise the fetch error.
    ///
    /// # Errors
    /// Returns the last fetch error, or `CrmError::Internal` when there is
    /// neither data nor an error (the key was never loaded).
    pub fn into_result(self) -> Result<T> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err(CrmError::Internal("resource has not been loaded".into())),
        }
    }
}

impl QueryState<Resource> {
    fn narrow<T>(self, key: ResourceKey, f: impl FnOnce(Resource) -> Option<T>) -> QueryState<T> {
        let QueryState { data, is_loading, mut error } = self;
        let data = match data.map(f) {
            Some(Some(typed)) => Some(typed),
            Some(None) => {
                error = Some(CrmError::Internal(format!(
                    "source returned a mismatched snapshot for '{key}'"
                )));
                None
            }
            None => None,
        };
        QueryState { data, is_loading, error }
    }
}

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEventKind {
    Invalidated,
    Refreshed,
    Failed,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEvent {
    pub key: ResourceKey,
    pub kind: CacheEventKind,
}

struct InFlight {
    id: u64,
    generation: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Entry {
    snapshot: Option<Resource>,
    fetched_at: Option<Instant>,
    stale: bool,
    error: Option<CrmError>,
    generation: u64,
    inflight: Option<InFlight>,
}

impl Entry {
    fn is_fresh(&self, stale_after: Option<Duration>, now: Instant) -> bool {
        if self.stale || self.snapshot.is_none() {
            return false;
        }
        match (stale_after, self.fetched_at) {
            (Some(window), Some(fetched_at)) => now.duration_since(fetched_at) < window,
            _ => true,
        }
    }

    fn state(&self) -> QueryState<Resource> {
        QueryState {
            data: self.snapshot.clone(),
            is_loading: self.inflight.is_some(),
            error: self.error.clone(),
        }
    }
}

/// Single owner of every fetched snapshot.
pub struct QueryCache {
    source: Arc<dyn ResourceSource>,
    entries: Mutex<HashMap<ResourceKey, Entry>>,
    stale_after: Option<Duration>,
    next_fetch_id: Mutex<u64>,
    events: broadcast::Sender<CacheEvent>,
}

impl QueryCache {
    /// Create a cache whose snapshots live until invalidated.
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
            stale_after: None,
            next_fetch_id: Mutex::new(0),
            events,
        }
    }

    /// Also treat snapshots older than `window` as stale.
    #[must_use]
    pub fn with_stale_after(mut self, window: Duration) -> Self {
        self.stale_after = Some(window);
        self
    }

    /// Receive invalidation and refresh events for every key.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Current state of `key` without triggering a fetch.
    pub fn peek(&self, key: ResourceKey) -> QueryState<Resource> {
        let entries = self.entries.lock();
        entries.get(&key).map_or(
            QueryState { data: None, is_loading: false, error: None },
            Entry::state,
        )
    }

    /// Return the snapshot for `key`, fetching it first when it is missing,
    /// invalidated or older than the staleness window.
    ///
    /// Callers that arrive while a fetch is outstanding wait on that same
    /// fetch instead of starting another one.
    pub async fn get(&self, key: ResourceKey) -> QueryState<Resource> {
        let (fetch_id, future) = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key).or_default();

            if entry.is_fresh(self.stale_after, Instant::now()) {
                if let Some(snapshot) = entry.snapshot.clone() {
                    return QueryState::ready(snapshot);
                }
            }

            // A fetch that began before the last invalidation cannot serve
            // this read; it is replaced and settles without writing.
            let generation = entry.generation;
            let joined = entry
                .inflight
                .as_ref()
                .filter(|inflight| inflight.generation == generation)
                .map(|inflight| (inflight.id, inflight.future.clone()));
            match joined {
                Some((id, future)) => {
                    debug!(%key, fetch_id = id, "joining in-flight fetch");
                    (id, future)
                }
                None => {
                    let id = self.allocate_fetch_id();
                    let source = Arc::clone(&self.source);
                    let future = async move { source.fetch(key).await }.boxed().shared();
                    entry.inflight =
                        Some(InFlight { id, generation: entry.generation, future: future.clone() });
                    debug!(%key, fetch_id = id, "starting fetch");
                    (id, future)
                }
            }
        };

        let result = future.await;
        self.settle(key, fetch_id, result)
    }

    /// Mark `key` stale so the next read refetches.
    pub fn invalidate(&self, key: ResourceKey) {
        {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key).or_default();
            entry.stale = true;
            entry.generation += 1;
        }
        debug!(%key, "invalidated");
        self.emit(key, CacheEventKind::Invalidated);
    }

    pub fn invalidate_many(&self, keys: &[ResourceKey]) {
        for key in keys {
            self.invalidate(*key);
        }
    }

    /// Typed read of the deal collection.
    pub async fn deals(&self) -> QueryState<Arc<Vec<Deal>>> {
        self.get(ResourceKey::Deals).await.narrow(ResourceKey::Deals, Resource::into_deals)
    }

    pub async fn contacts(&self) -> QueryState<Arc<Vec<Contact>>> {
        self.get(ResourceKey::Contacts).await.narrow(ResourceKey::Contacts, Resource::into_contacts)
    }

    pub async fn companies(&self) -> QueryState<Arc<Vec<Company>>> {
        self.get(ResourceKey::Companies)
            .await
            .narrow(ResourceKey::Companies, Resource::into_companies)
    }

    pub async fn dashboard(&self) -> QueryState<Arc<DashboardReport>> {
        self.get(ResourceKey::Dashboard)
            .await
            .narrow(ResourceKey::Dashboard, Resource::into_dashboard)
    }

    fn allocate_fetch_id(&self) -> u64 {
        let mut next = self.next_fetch_id.lock();
        *next += 1;
        *next
    }

    /// Apply a finished fetch. Only the waiter whose fetch is still the
    /// entry's in-flight one writes; the others just report the result.
    fn settle(&self, key: ResourceKey, fetch_id: u64, result: Result<Resource>) -> QueryState<Resource> {
        let mut event = None;
        let state = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key).or_default();
            let owns_fetch = entry.inflight.as_ref().is_some_and(|inflight| inflight.id == fetch_id);

            if owns_fetch {
                let started_at_generation =
                    entry.inflight.take().map_or(entry.generation, |inflight| inflight.generation);
                match &result {
                    Ok(resource) => {
                        entry.snapshot = Some(resource.clone());
                        entry.fetched_at = Some(Instant::now());
                        entry.error = None;
                        entry.stale = started_at_generation != entry.generation;
                        event = Some(CacheEventKind::Refreshed);
                    }
                    Err(err) => {
                        warn!(%key, error = %err, "fetch failed; keeping previous snapshot");
                        entry.error = Some(err.clone());
                        event = Some(CacheEventKind::Failed);
                    }
                }
            }

            match result {
                Ok(resource) => QueryState::ready(resource),
                Err(err) => QueryState { data: entry.snapshot.clone(), is_loading: false, error: Some(err) },
            }
        };

        if let Some(kind) = event {
            self.emit(key, kind);
        }
        state
    }

    fn emit(&self, key: ResourceKey, kind: CacheEventKind) {
        // No subscribers is not an error.
        let _ = self.events.send(CacheEvent { key, kind });
    }
}
