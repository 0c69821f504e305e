//! Cache-aside implementation.

use derive_getters::Getters;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// One memoized computation result.
///
/// An entry is observable only while `now < expires_at`.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

/// Deadline used when `now + ttl` does not fit in an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Smallest period the background sweeper ticks at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

impl<T> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self { value, expires_at }
    }

    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.expires_at.checked_duration_since(Instant::now())
    }
}

/// Configuration for a [`CacheAside`].
#[derive(
    Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct CacheConfig {
    /// TTL applied when a caller passes none (seconds)
    #[serde(default = "default_ttl_secs")]
    default_ttl_secs: u64,

    /// Maximum number of live entries
    #[serde(default = "default_max_entries")]
    max_entries: usize,

    /// Interval between background expiry sweeps (seconds)
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,

    /// Whether values are retained at all
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_entries() -> usize {
    10_000
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_enabled() -> bool {
    true
}

impl CacheConfig {
    /// Default TTL as a duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Sweep interval as a duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            sweep_interval_secs: default_sweep_interval_secs(),
            enabled: default_enabled(),
        }
    }
}

/// Get-or-compute memoization keyed by string.
///
/// Reads go through [`get`](Self::get): a live entry is returned as is, a
/// missing or expired one is recomputed by the caller's closure and stored.
/// Concurrent misses on the same key each run their closure; the last one to
/// finish wins the slot.
///
/// # Example
///
/// ```
/// use statbot_cache::{CacheAside, CacheConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache: CacheAside<u32> = CacheAside::new(CacheConfig::default());
///
/// let value = cache
///     .get("sql.player.getPlayer-john-pc", || async { Ok::<_, ()>(42) }, None)
///     .await
///     .unwrap();
/// assert_eq!(value, 42);
///
/// cache.del_starting_with("sql.player.");
/// assert!(cache.peek("sql.player.getPlayer-john-pc").is_none());
/// # }
/// ```
pub struct CacheAside<T> {
    config: CacheConfig,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T> CacheAside<T>
where
    T: Clone,
{
    /// Create a new cache with configuration.
    pub fn new(config: CacheConfig) -> Self {
        tracing::debug!(
            default_ttl_secs = config.default_ttl_secs,
            max_entries = config.max_entries,
            enabled = config.enabled,
            "Creating new CacheAside"
        );
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the live value under `key`, computing and storing it on a miss.
    ///
    /// A failing `compute` is returned to the caller unchanged and nothing is
    /// stored.
    #[tracing::instrument(level = "debug", skip(self, compute, ttl), fields(hit))]
    pub async fn get<F, Fut, E>(&self, key: &str, compute: F, ttl: Option<Duration>) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.peek(key) {
            tracing::Span::current().record("hit", true);
            tracing::debug!("Cache hit");
            return Ok(value);
        }

        tracing::Span::current().record("hit", false);
        tracing::debug!("Cache miss, computing");
        let value = compute().await?;
        self.store(key, value.clone(), ttl);
        Ok(value)
    }

    /// Compute and store unconditionally, overwriting any existing entry.
    #[tracing::instrument(level = "debug", skip(self, compute, ttl))]
    pub async fn put<F, Fut, E>(&self, key: &str, compute: F, ttl: Option<Duration>) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let value = compute().await?;
        self.store(key, value.clone(), ttl);
        tracing::debug!("Refreshed cache entry");
        Ok(value)
    }

    /// Read a live value without computing anything.
    pub fn peek(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    /// Remove one exact-match entry. Returns whether an entry was present.
    pub fn del(&self, key: &str) -> bool {
        let removed = self.entries.lock().remove(key).is_some();
        tracing::debug!(key, removed, "Deleted cache entry");
        removed
    }

    /// Remove several exact-match entries. Returns how many were present.
    pub fn del_many<I, K>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut entries = self.entries.lock();
        let removed = keys
            .into_iter()
            .filter(|key| entries.remove(key.as_ref()).is_some())
            .count();
        tracing::debug!(removed, "Deleted cache entries");
        removed
    }

    /// Remove every entry whose key starts with `prefix`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn del_starting_with(&self, prefix: &str) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        tracing::debug!(removed, "Invalidated cache key family");
        removed
    }

    /// Remove all entries.
    pub fn flush(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        tracing::info!(cleared = count, "Flushed cache");
    }

    /// Remove expired entries from the cache.
    pub fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "Swept expired cache entries");
        }
        removed
    }

    /// Number of stored entries, including any not yet swept.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn store(&self, key: &str, value: T, ttl: Option<Duration>) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping store");
            return;
        }

        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        let mut entries = self.entries.lock();

        if entries.len() >= self.config.max_entries && !entries.contains_key(key) {
            entries.retain(|_, entry| !entry.is_expired());
            if entries.len() >= self.config.max_entries {
                Self::evict_soonest_expiring(&mut entries);
            }
        }

        entries.insert(key.to_string(), CacheEntry::new(value, ttl));
    }

    fn evict_soonest_expiring(entries: &mut HashMap<String, CacheEntry<T>>) {
        let victim = entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            tracing::debug!(key = %key, "Evicting cache entry at capacity");
            entries.remove(&key);
        }
    }
}

impl<T> CacheAside<T>
where
    T: Clone + Send + 'static,
{
    /// Spawn a background task that sweeps expired entries on an interval.
    ///
    /// The task holds only a weak reference and exits once the cache is dropped.
    /// Intervals shorter than one second are raised to one second.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let period = self.config.sweep_interval().max(MIN_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = weak.upgrade() else {
                    tracing::debug!("Cache dropped, stopping sweeper");
                    break;
                };
                cache.sweep_expired();
            }
        })
    }
}

impl<T: Clone> Default for CacheAside<T> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_at_exact_instant() {
        let entry = CacheEntry::new(1u8, Duration::from_secs(5));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(entry.is_expired());
        assert_eq!(entry.time_remaining(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_disabled_cache_always_computes() {
        let cache = CacheAside::new(CacheConfig::default().with_enabled(false));
        let mut calls = 0;
        for _ in 0..2 {
            let compute = || {
                calls += 1;
                async { Ok::<_, ()>(7) }
            };
            cache.get("k", compute, None).await.unwrap();
        }
        assert_eq!(calls, 2);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_soonest_expiring() {
        let cache = CacheAside::new(CacheConfig::default().with_max_entries(2));
        let short = Some(Duration::from_secs(10));
        let long = Some(Duration::from_secs(100));
        cache.put("short", || async { Ok::<_, ()>(1) }, short).await.unwrap();
        cache.put("long", || async { Ok::<_, ()>(2) }, long).await.unwrap();
        cache.put("new", || async { Ok::<_, ()>(3) }, None).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.peek("short").is_none());
        assert_eq!(cache.peek("long"), Some(2));
        assert_eq!(cache.peek("new"), Some(3));
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = CacheConfigBuilder::default()
            .default_ttl_secs(30)
            .build()
            .unwrap();
        assert_eq!(*config.default_ttl_secs(), 30);
        assert_eq!(*config.max_entries(), 10_000);
        assert!(*config.enabled());
    }
}
