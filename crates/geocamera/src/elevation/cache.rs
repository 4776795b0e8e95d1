//! Ground elevation cache with at-most-one fetch per key.
//!
//! A lookup never waits on the network. On a miss the cache spawns a single
//! background fetch for the key and answers `None`; further lookups for the
//! same key while that fetch is in flight schedule nothing. Fetch results
//! come back over a channel and are folded in by [`ElevationCache::poll_completed`],
//! which every lookup runs first.
//!
//! Failed fetches are logged and dropped: the key stays absent and the next
//! lookup for it starts a fresh attempt.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    hash::BuildHasher,
    pin::pin,
    sync::{Arc, PoisonError, RwLock, RwLockWriteGuard},
};

use tokio::sync::Notify;

use super::{ElevationConfig, ElevationKey, ElevationSource, OpenTopoData};
use crate::error::Result;
use crate::spawn::TaskSpawner;

/// Anything that can answer "ground elevation for this cell, if known".
///
/// Implemented by [`ElevationCache`] (which fetches on a miss) and by plain
/// maps, which makes the readout engine testable without a runtime.
pub trait ElevationLookup {
    fn lookup(&self, key: &ElevationKey) -> Option<f32>;
}

impl<S: BuildHasher> ElevationLookup for HashMap<ElevationKey, f32, S> {
    fn lookup(&self, key: &ElevationKey) -> Option<f32> {
        self.get(key).copied()
    }
}

/// Outcome of one background fetch.
type Completion = (ElevationKey, Result<f32>);

/// Cache of ground elevations keyed by [`ElevationKey`].
///
/// Cloning shares the same entries, in-flight set and source.
pub struct ElevationCache<S: ElevationSource = OpenTopoData> {
    inner: Arc<RwLock<CacheInner>>,
    source: Arc<S>,
    spawner: TaskSpawner,
    max_entries: Option<usize>,
    completed_tx: async_channel::Sender<Completion>,
    completed_rx: async_channel::Receiver<Completion>,
    /// Signalled when a completion is sent and again when it is folded in.
    progress: Arc<Notify>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<ElevationKey, f32>,
    /// Insertion order for oldest-first eviction.
    order: VecDeque<ElevationKey>,
    in_flight: HashSet<ElevationKey>,
    /// Completions folded in so far, by any clone.
    folded: u64,
}

impl CacheInner {
    fn insert(&mut self, key: ElevationKey, elevation: f32, max_entries: Option<usize>) {
        if self.entries.insert(key.clone(), elevation).is_none() {
            self.order.push_back(key);
        }

        if let Some(max_entries) = max_entries {
            while self.entries.len() > max_entries {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
                tracing::debug!(key = %oldest, "evicted elevation");
            }
        }
    }
}

impl ElevationCache<OpenTopoData> {
    /// Create a cache backed by the Open Topo Data API described by `config`.
    pub fn open_topo_data(config: &ElevationConfig, spawner: TaskSpawner) -> Result<Self> {
        let source = OpenTopoData::new(config)?;
        let cache = Self::new(source, spawner);
        Ok(match config.max_entries {
            Some(max_entries) => cache.with_max_entries(max_entries),
            None => cache,
        })
    }
}

impl<S: ElevationSource> ElevationCache<S> {
    /// Create an unbounded cache that fetches from `source`.
    #[must_use]
    pub fn new(source: S, spawner: TaskSpawner) -> Self {
        let (completed_tx, completed_rx) = async_channel::unbounded();
        Self {
            inner: Arc::new(RwLock::new(CacheInner::default())),
            source: Arc::new(source),
            spawner,
            max_entries: None,
            completed_tx,
            completed_rx,
            progress: Arc::new(Notify::new()),
        }
    }

    /// Limit the cache to `max_entries` elevations (at least one), evicting
    /// the oldest inserted entry first.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    /// Look up the elevation for `key`, scheduling a fetch on a miss.
    ///
    /// Returns `None` until a fetch for the key has succeeded. At most one
    /// fetch per key is in flight at any time.
    pub fn lookup(&self, key: &ElevationKey) -> Option<f32> {
        self.poll_completed();

        if let Some(elevation) = self.read_entry(key) {
            tracing::trace!(%key, elevation, "elevation cache hit");
            return Some(elevation);
        }

        let mut inner = self.write_inner();
        // A completion may have landed between the read and the write lock.
        if let Some(&elevation) = inner.entries.get(key) {
            return Some(elevation);
        }
        if !inner.in_flight.insert(key.clone()) {
            return None;
        }
        drop(inner);

        tracing::debug!(%key, "elevation cache miss, fetching");

        let source = Arc::clone(&self.source);
        let tx = self.completed_tx.clone();
        let progress = Arc::clone(&self.progress);
        let key = key.clone();
        self.spawner.spawn(async move {
            let result = source.fetch(&key).await;
            let _ = tx.send((key, result)).await;
            progress.notify_waiters();
        });

        None
    }

    /// Fold finished fetches into the cache.
    ///
    /// Returns the number of fetches (successful or not) processed.
    pub fn poll_completed(&self) -> usize {
        let mut processed = 0;
        while let Ok(completion) = self.completed_rx.try_recv() {
            self.complete(completion);
            processed += 1;
        }
        processed
    }

    /// Wait until at least one in-flight fetch finishes, then fold in every
    /// finished fetch.
    ///
    /// Returns the number of fetches this call folded in. That is `0` if
    /// nothing is in flight, or if another clone folded the completion first.
    pub async fn wait_completed(&self) -> usize {
        let folded = self.folded_count();

        loop {
            // Register before checking so a notification in between is kept.
            let mut notified = pin!(self.progress.notified());
            notified.as_mut().enable();

            let processed = self.poll_completed();
            if processed > 0 {
                return processed;
            }
            if self.folded_count() != folded || self.pending_count() == 0 {
                return 0;
            }

            notified.await;
        }
    }

    fn folded_count(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .folded
    }

    fn complete(&self, (key, result): Completion) {
        let mut inner = self.write_inner();
        inner.in_flight.remove(&key);
        inner.folded += 1;
        match result {
            Ok(elevation) => {
                tracing::debug!(%key, elevation, "elevation fetched");
                inner.insert(key, elevation, self.max_entries);
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "elevation fetch failed");
            }
        }
        drop(inner);
        self.progress.notify_waiters();
    }

    /// Cached elevation for `key`, without scheduling a fetch.
    #[must_use]
    pub fn get(&self, key: &ElevationKey) -> Option<f32> {
        self.poll_completed();
        self.read_entry(key)
    }

    #[must_use]
    pub fn contains(&self, key: &ElevationKey) -> bool {
        self.get(key).is_some()
    }

    /// Whether a fetch for `key` has been scheduled and not yet folded in.
    #[must_use]
    pub fn is_pending(&self, key: &ElevationKey) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .contains(key)
    }

    /// Number of fetches scheduled and not yet folded in.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .len()
    }

    /// Get the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached elevation. In-flight fetches still land.
    pub fn clear(&self) {
        let mut inner = self.write_inner();
        inner.entries.clear();
        inner.order.clear();
    }

    fn read_entry(&self, key: &ElevationKey) -> Option<f32> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(key)
            .copied()
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, CacheInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: ElevationSource> ElevationLookup for ElevationCache<S> {
    fn lookup(&self, key: &ElevationKey) -> Option<f32> {
        ElevationCache::lookup(self, key)
    }
}

impl<S: ElevationSource> Clone for ElevationCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            source: Arc::clone(&self.source),
            spawner: self.spawner.clone(),
            max_entries: self.max_entries,
            completed_tx: self.completed_tx.clone(),
            completed_rx: self.completed_rx.clone(),
            progress: Arc::clone(&self.progress),
        }
    }
}
