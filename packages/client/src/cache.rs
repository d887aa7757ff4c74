//! Keyed response cache with in-flight deduplication.
//!
//! Each [`QueryKey`] moves through
//! `absent -> loading -> fresh -> stale -> refetching -> fresh`, and is
//! dropped once it has not been used for [`CacheConfig::evict_after`].
//! While a fetch for a key is running, further callers for the same key wait
//! for it and receive the same result instead of issuing their own request.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use jobdash_listings::pagination::Pagination;
use jobdash_listings::{JobsPage, JobsQuery};
use tokio::sync::OnceCell;
use tokio::time::Instant;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a response is served without asking the server again.
    pub fresh_for: Duration,
    /// Entries untouched for this long are dropped.
    pub evict_after: Duration,
    /// Extra attempts after a failed fetch.
    pub retries: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fresh_for: Duration::from_secs(5 * 60),
            evict_after: Duration::from_secs(30 * 60),
            retries: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Jobs,
    Stats,
}

/// Identity of a cached request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: ResourceKind,
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub remote_only: bool,
    pub site: String,
    pub job_title: String,
}

impl QueryKey {
    pub fn jobs(query: &JobsQuery) -> Self {
        Self {
            kind: ResourceKind::Jobs,
            page: query.page,
            limit: query.limit,
            search: query.criteria.search.clone(),
            remote_only: query.criteria.remote_only,
            site: query.criteria.site.clone(),
            job_title: query.criteria.job_title.clone(),
        }
    }

    pub fn stats() -> Self {
        Self {
            kind: ResourceKind::Stats,
            page: 0,
            limit: 0,
            search: String::new(),
            remote_only: false,
            site: String::new(),
            job_title: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub updated_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn is_stale(&self, now: Instant, fresh_for: Duration) -> bool {
        now.saturating_duration_since(self.updated_at) >= fresh_for
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Absent,
    Loading,
    Fresh,
    Stale,
    Refetching,
}

type InFlight<V> = Arc<OnceCell<Result<V>>>;

struct Slot<V> {
    entry: Option<CacheEntry<V>>,
    in_flight: Option<InFlight<V>>,
    last_used: Instant,
    /// Monotonic use counter; breaks ties between equal instants.
    used_seq: u64,
}

struct Slots<V> {
    map: HashMap<QueryKey, Slot<V>>,
    seq: u64,
}

impl<V> Slots<V> {
    fn touch(&mut self, key: &QueryKey, now: Instant) -> &mut Slot<V> {
        self.seq += 1;
        let seq = self.seq;
        let slot = self.map.entry(key.clone()).or_insert_with(|| Slot {
            entry: None,
            in_flight: None,
            last_used: now,
            used_seq: seq,
        });
        slot.last_used = now;
        slot.used_seq = seq;
        slot
    }
}

/// Response cache for one value type, shared by reference between consumers.
pub struct QueryCache<V> {
    config: CacheConfig,
    slots: Mutex<Slots<V>>,
}

impl<V> QueryCache<V> {
    fn lock(&self) -> MutexGuard<'_, Slots<V>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Detaches an in-flight cell from its slot when the last caller waiting on
/// it is dropped before the fetch settles.
struct InFlightGuard<'a, V> {
    cache: &'a QueryCache<V>,
    key: &'a QueryKey,
    cell: InFlight<V>,
    settled: bool,
}

impl<V> Drop for InFlightGuard<'_, V> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut slots = self.cache.lock();
        let Some(slot) = slots.map.get_mut(self.key) else {
            return;
        };
        // One reference is held by the slot, one by this guard; any more
        // belong to other waiters that will settle the cell themselves.
        let abandoned = Arc::strong_count(&self.cell) <= 2
            && slot
                .in_flight
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, &self.cell));
        if abandoned {
            tracing::debug!(key = ?self.key, "fetch cancelled, releasing slot");
            slot.in_flight = None;
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            slots: Mutex::new(Slots {
                map: HashMap::new(),
                seq: 0,
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Last stored value for `key`, fresh or not.
    pub fn get(&self, key: &QueryKey) -> Option<CacheEntry<V>> {
        let now = Instant::now();
        let mut slots = self.lock();
        self.evict_locked(&mut slots, now);
        slots.map.get(key)?.entry.as_ref()?;
        slots.touch(key, now).entry.clone()
    }

    /// Store `value` as if it had been fetched at `at`.
    pub fn set(&self, key: &QueryKey, value: V, at: Instant) {
        let mut slots = self.lock();
        let slot = slots.touch(key, Instant::now());
        slot.entry = Some(CacheEntry {
            value,
            updated_at: at,
        });
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        let now = Instant::now();
        let slots = self.lock();
        let Some(slot) = slots.map.get(key) else {
            return QueryStatus::Absent;
        };
        match (&slot.entry, slot.in_flight.is_some()) {
            (None, true) => QueryStatus::Loading,
            (None, false) => QueryStatus::Absent,
            (Some(_), true) => QueryStatus::Refetching,
            (Some(entry), false) if entry.is_stale(now, self.config.fresh_for) => {
                QueryStatus::Stale
            }
            (Some(_), false) => QueryStatus::Fresh,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries not used within the eviction window. Returns how many
    /// were removed.
    pub fn evict_unused(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.lock();
        self.evict_locked(&mut slots, now)
    }

    fn evict_locked(&self, slots: &mut Slots<V>, now: Instant) -> usize {
        let before = slots.map.len();
        let evict_after = self.config.evict_after;
        slots.map.retain(|_, slot| {
            slot.in_flight.is_some() || now.saturating_duration_since(slot.last_used) < evict_after
        });
        let evicted = before - slots.map.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted unused cache entries");
        }
        evicted
    }

    /// Return the cached value for `key` while it is fresh, otherwise run
    /// `fetcher`.
    ///
    /// Concurrent calls for the same key share one fetch. A failed fetch is
    /// retried [`CacheConfig::retries`] times; if it still fails and an older
    /// value exists, that value is returned instead of the error.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<V>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let cell = {
            let now = Instant::now();
            let mut slots = self.lock();
            self.evict_locked(&mut slots, now);
            let fresh_for = self.config.fresh_for;
            let slot = slots.touch(key, now);
            if let Some(entry) = &slot.entry {
                if !entry.is_stale(now, fresh_for) {
                    return Ok(entry.value.clone());
                }
            }
            slot.in_flight
                .get_or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let mut guard = InFlightGuard {
            cache: self,
            key,
            cell,
            settled: false,
        };
        let outcome = guard
            .cell
            .get_or_init(|| self.fetch_with_retry(key, &fetcher))
            .await
            .clone();
        guard.settled = true;
        let cell = guard.cell.clone();
        drop(guard);

        let mut slots = self.lock();
        let Some(slot) = slots.map.get_mut(key) else {
            return outcome;
        };

        // The first waiter to get here settles the slot; later ones find the
        // cell already detached.
        if slot
            .in_flight
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &cell))
        {
            slot.in_flight = None;
            if let Ok(value) = &outcome {
                slot.entry = Some(CacheEntry {
                    value: value.clone(),
                    updated_at: Instant::now(),
                });
            }
        }

        match outcome {
            Ok(value) => Ok(value),
            Err(e) => match &slot.entry {
                Some(stale) => {
                    tracing::warn!(error = %e, ?key, "refetch failed, serving cached value");
                    Ok(stale.value.clone())
                }
                None => Err(e),
            },
        }
    }

    async fn fetch_with_retry<F, Fut>(&self, key: &QueryKey, fetcher: &F) -> Result<V>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.config.retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, ?key, attempt, "fetch failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Browsing state recovered from earlier requests for a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredState {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub job_title: String,
    /// Present when the matching entry holds a response.
    pub pagination: Option<Pagination>,
}

impl QueryCache<JobsPage> {
    /// Most recently used jobs request whose site filter equals `site`.
    pub fn recover(&self, site: &str) -> Option<RecoveredState> {
        let mut slots = self.lock();
        self.evict_locked(&mut slots, Instant::now());
        let (key, slot) = slots
            .map
            .iter()
            .filter(|(k, _)| k.kind == ResourceKind::Jobs && k.site == site)
            .max_by_key(|(_, slot)| slot.used_seq)?;

        Some(RecoveredState {
            page: key.page,
            limit: key.limit,
            search: key.search.clone(),
            job_title: key.job_title.clone(),
            pagination: slot.entry.as_ref().map(|e| e.value.pagination),
        })
    }
}
