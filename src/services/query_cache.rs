// src/services/query_cache.rs
//
// Query Cache - keyed results of catalog aggregations.
//
// CRITICAL RULES:
// - At most one load in flight per key; callers that arrive while it runs
//   share its outcome, success or failure
// - Fresh values come from memory, stale values are served at once while a
//   background refresh runs
// - A failed load never discards the last good value
// - Only transient errors are retried
// - Values are shared as Arc snapshots and never mutated in place

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::retry::RetryPolicy;
use crate::error::{AppError, AppResult};

// ============================================================================
// KEYS AND POLICIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    AllContent,
    ByFeature(String),
    ByGenre(String),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::AllContent => write!(f, "all-content"),
            QueryKey::ByFeature(tag) => write!(f, "content-by-feature:{}", tag),
            QueryKey::ByGenre(genre) => write!(f, "content-by-genre:{}", genre),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Age after which a value is served stale and refreshed in the background
    pub stale_time: Duration,
    /// Period of the refresh task started by `watch`
    pub refetch_interval: Duration,
    /// Idle time after which `evict_idle` drops the entry
    pub gc_time: Duration,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicies {
    pub all_content: QueryPolicy,
    pub by_feature: QueryPolicy,
    pub by_genre: QueryPolicy,
}

impl Default for CachePolicies {
    fn default() -> Self {
        let rail = QueryPolicy {
            stale_time: Duration::from_secs(30),
            refetch_interval: Duration::from_secs(60),
            gc_time: Duration::from_secs(5 * 60),
            retry: RetryPolicy::default(),
        };

        Self {
            all_content: QueryPolicy {
                stale_time: Duration::from_secs(10),
                refetch_interval: Duration::from_secs(30),
                ..rail
            },
            by_feature: rail,
            by_genre: rail,
        }
    }
}

impl CachePolicies {
    pub fn for_key(&self, key: &QueryKey) -> &QueryPolicy {
        match key {
            QueryKey::AllContent => &self.all_content,
            QueryKey::ByFeature(_) => &self.by_feature,
            QueryKey::ByGenre(_) => &self.by_genre,
        }
    }
}

/// Produces the value of a key
#[async_trait]
pub trait QueryLoader<V>: Send + Sync {
    async fn load(&self, key: &QueryKey) -> AppResult<V>;
}

// ============================================================================
// ENTRIES
// ============================================================================

type Outcome<V> = Result<Arc<V>, Arc<AppError>>;

struct CacheEntry<V> {
    /// Held for the whole duration of a load
    gate: tokio::sync::Mutex<()>,
    state: Mutex<EntryState<V>>,
}

struct EntryState<V> {
    value: Option<Arc<V>>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    /// Bumped by every completed load
    generation: u64,
    last_outcome: Option<Outcome<V>>,
    last_access: Instant,
    refresh_scheduled: bool,
}

impl<V> CacheEntry<V> {
    fn new() -> Self {
        Self {
            gate: tokio::sync::Mutex::new(()),
            state: Mutex::new(EntryState {
                value: None,
                fetched_at: None,
                invalidated: false,
                generation: 0,
                last_outcome: None,
                last_access: Instant::now(),
                refresh_scheduled: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EntryState<V>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<V> EntryState<V> {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        match (&self.value, self.fetched_at) {
            (Some(_), Some(at)) => !self.invalidated && at.elapsed() < stale_time,
            _ => false,
        }
    }

    /// Outcome of a load that completed after the caller saw `generation`
    fn outcome_since(&self, generation: u64) -> Option<Outcome<V>> {
        if self.generation == generation {
            return None;
        }
        self.last_outcome.clone()
    }
}

// ============================================================================
// CACHE
// ============================================================================

pub struct QueryCache<V> {
    loader: Arc<dyn QueryLoader<V>>,
    policies: CachePolicies,
    entries: Mutex<HashMap<QueryKey, Arc<CacheEntry<V>>>>,
}

impl<V: Send + Sync + 'static> QueryCache<V> {
    pub fn new(loader: Arc<dyn QueryLoader<V>>, policies: CachePolicies) -> Self {
        Self {
            loader,
            policies,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn policies(&self) -> &CachePolicies {
        &self.policies
    }

    /// Value of `key`: from memory when fresh, stale with a background
    /// refresh when old, loaded when absent.
    pub async fn get(self: &Arc<Self>, key: &QueryKey) -> AppResult<Arc<V>> {
        let entry = self.entry(key);
        let policy = self.policies.for_key(key);

        let seen = {
            let mut state = entry.lock();
            state.last_access = Instant::now();

            if let Some(value) = state.value.clone() {
                if state.is_fresh(policy.stale_time) {
                    log::trace!("{}: fresh hit", key);
                    return Ok(value);
                }

                if !state.refresh_scheduled {
                    state.refresh_scheduled = true;
                    self.spawn_refresh(key.clone(), Arc::clone(&entry), state.generation);
                }
                log::debug!("{}: serving stale value", key);
                return Ok(value);
            }

            state.generation
        };

        self.load(key, &entry, seen).await
    }

    /// Load `key` now regardless of freshness, joining a load already in flight
    pub async fn refresh(&self, key: &QueryKey) -> AppResult<Arc<V>> {
        let entry = self.entry(key);
        let seen = entry.lock().generation;
        self.load(key, &entry, seen).await
    }

    /// Mark `key` stale; the next `get` serves it and refreshes
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.existing(key) {
            entry.lock().invalidated = true;
            log::debug!("{}: invalidated", key);
        }
    }

    /// Last good value of `key`, without loading
    pub fn peek(&self, key: &QueryKey) -> Option<Arc<V>> {
        self.existing(key).and_then(|entry| entry.lock().value.clone())
    }

    /// Drop entries nobody asked for within their GC time. Returns how many went.
    pub fn evict_idle(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = entries.len();

        entries.retain(|key, entry| {
            if entry.gate.try_lock().is_err() {
                return true;
            }
            let gc_time = self.policies.for_key(key).gc_time;
            entry.lock().last_access.elapsed() < gc_time
        });

        let evicted = before - entries.len();
        if evicted > 0 {
            log::debug!("Evicted {} idle cache entries", evicted);
        }
        evicted
    }

    /// Refresh `key` every refetch interval until the handle is dropped
    pub fn watch(self: &Arc<Self>, key: QueryKey) -> QueryWatch {
        let period = self.policies.for_key(&key).refetch_interval;
        let cache = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if let Err(e) = cache.refresh(&key).await {
                    log::warn!("{}: periodic refresh failed: {}", key, e);
                }
            }
        });

        QueryWatch { handle }
    }

    fn entry(&self, key: &QueryKey) -> Arc<CacheEntry<V>> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(entries.entry(key.clone()).or_insert_with(|| Arc::new(CacheEntry::new())))
    }

    fn existing(&self, key: &QueryKey) -> Option<Arc<CacheEntry<V>>> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(key).cloned()
    }

    fn spawn_refresh(self: &Arc<Self>, key: QueryKey, entry: Arc<CacheEntry<V>>, seen: u64) {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = cache.load(&key, &entry, seen).await {
                log::warn!("{}: background refresh failed, keeping last value: {}", key, e);
            }
            entry.lock().refresh_scheduled = false;
        });
    }

    /// Load under the entry's gate. `seen` is the generation the caller
    /// observed on arrival; a newer one means a load finished meanwhile.
    async fn load(&self, key: &QueryKey, entry: &CacheEntry<V>, seen: u64) -> AppResult<Arc<V>> {
        let _gate = entry.gate.lock().await;

        let joined = entry.lock().outcome_since(seen);
        if let Some(outcome) = joined {
            log::trace!("{}: joined in-flight load", key);
            return outcome.map_err(AppError::Shared);
        }

        let policy = self.policies.for_key(key);
        let label = key.to_string();
        let result = policy.retry.run(&label, || self.loader.load(key)).await;
        let completed_at = Instant::now();

        let mut state = entry.lock();
        state.generation += 1;
        match result {
            Ok(value) => {
                let value = Arc::new(value);
                state.value = Some(Arc::clone(&value));
                state.fetched_at = Some(completed_at);
                state.invalidated = false;
                state.last_outcome = Some(Ok(Arc::clone(&value)));
                log::debug!("{}: loaded", key);
                Ok(value)
            }
            Err(e) => {
                log::error!("{}: load failed: {}", key, e);
                let e = Arc::new(e);
                state.last_outcome = Some(Err(Arc::clone(&e)));
                Err(AppError::Shared(e))
            }
        }
    }
}

/// Handle of a `watch` refresh task; dropping it stops the task
pub struct QueryWatch {
    handle: JoinHandle<()>,
}

impl Drop for QueryWatch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
