//! TTL response cache with fetch-on-miss.
//!
//! Entries are only ever evicted lazily (on the read that finds them expired)
//! or by an explicit sweep; a write never evicts anything. The sweep can run
//! as a background task started by whoever owns the cache, see
//! [`spawn_sweeper`].
//!
//! Concurrent misses on the same key are not coalesced: two callers racing on
//! a cold key both run their fetch and the later write wins.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

/// Maximum number of keys handed to one batch fetch call.
pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Usable iff `now` is strictly before the expiry.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// String-keyed cache whose entries expire after a per-entry time to live.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
    batch_size: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_batch_size(default_ttl, DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(default_ttl: Duration, batch_size: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
            batch_size: batch_size.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a fresh value. An expired entry found here is removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.entries();

        let freshness = entries.get(key).map(|entry| entry.is_fresh_at(now));
        match freshness {
            Some(true) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache hit");
                entries.get(key).map(|entry| entry.value.clone())
            }
            Some(false) => {
                entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache entry expired");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache miss");
                None
            }
        }
    }

    /// Whether a fresh entry exists, without touching the hit/miss counters.
    pub fn contains_fresh(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries()
            .get(key)
            .is_some_and(|entry| entry.is_fresh_at(now))
    }

    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries()
            .insert(key.into(), CacheEntry::new(value, ttl));
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.entries().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh_at(now));
        before - entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Return the cached value for `key`, or run `fetch`, store its result
    /// for `ttl` and return it. Fetch failures are returned unchanged and
    /// leave the cache untouched.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.insert(key, value.clone(), ttl);
        Ok(value)
    }

    /// Resolve many keys at once.
    ///
    /// Cached keys are served directly; the rest are handed to `batch_fetch`
    /// in chunks of at most [`batch_size`](Self::batch_size) keys. The batch
    /// function must return one result per key, in the order given. Keys
    /// whose fetch fails are left out of the returned list; everything else
    /// comes back in input order, with repeated keys collapsed to their first
    /// occurrence.
    pub async fn get_or_fetch_many<F, Fut, E>(
        &self,
        keys: &[String],
        ttl: Duration,
        mut batch_fetch: F,
    ) -> Vec<V>
    where
        F: FnMut(Vec<String>) -> Fut,
        Fut: Future<Output = Vec<Result<V, E>>>,
        E: Display,
    {
        let mut seen = HashSet::new();
        let unique: Vec<&String> = keys
            .iter()
            .filter(|key| seen.insert(key.as_str()))
            .collect();

        let mut resolved: HashMap<String, V> = HashMap::with_capacity(unique.len());
        let mut missing: Vec<String> = Vec::new();
        for key in &unique {
            match self.get(key) {
                Some(value) => {
                    resolved.insert((*key).clone(), value);
                }
                None => missing.push((*key).clone()),
            }
        }

        if !missing.is_empty() {
            debug!(
                requested = unique.len(),
                missing = missing.len(),
                "fetching uncached keys"
            );
        }

        for chunk in missing.chunks(self.batch_size) {
            let results = batch_fetch(chunk.to_vec()).await;
            if results.len() != chunk.len() {
                warn!(
                    expected = chunk.len(),
                    received = results.len(),
                    "batch fetch returned the wrong number of results"
                );
            }

            for (key, result) in chunk.iter().zip(results) {
                match result {
                    Ok(value) => {
                        self.insert(key.as_str(), value.clone(), ttl);
                        resolved.insert(key.clone(), value);
                    }
                    Err(err) => {
                        warn!(key = %key, error = %err, "dropping key from batch result");
                    }
                }
            }
        }

        unique
            .into_iter()
            .filter_map(|key| resolved.remove(key.as_str()))
            .collect()
    }
}

/// Handle to a running sweep task. Dropping it stops the task.
#[derive(Debug)]
pub struct SweepHandle {
    task: JoinHandle<()>,
}

impl SweepHandle {
    pub fn shutdown(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start a background task that sweeps expired entries every `every`.
///
/// The task only holds a weak reference and exits on its own once the cache
/// has been dropped.
pub fn spawn_sweeper<V>(cache: &Arc<TtlCache<V>>, every: Duration) -> SweepHandle
where
    V: Clone + Send + 'static,
{
    let cache = Arc::downgrade(cache);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(live) = cache.upgrade() else {
                debug!("cache dropped, stopping sweeper");
                break;
            };

            let removed = live.sweep_expired();
            if removed > 0 {
                debug!(removed, remaining = live.len(), "swept expired cache entries");
            }
        }
    });

    SweepHandle { task }
}
