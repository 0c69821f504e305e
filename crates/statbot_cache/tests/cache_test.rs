//! Tests for cache-aside memoization.

use statbot_cache::{CacheAside, CacheConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Compute closure that counts its invocations and returns a fixed value.
fn counting(
    calls: &Arc<AtomicUsize>,
    value: &'static str,
) -> impl FnOnce() -> std::future::Ready<Result<String, String>> {
    let calls = calls.clone();
    move || {
        calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Ok(value.to_string()))
    }
}

#[tokio::test]
async fn test_get_within_ttl_returns_same_value() {
    let cache = CacheAside::new(CacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    let first = cache.get("player-john", counting(&calls, "john"), None).await.unwrap();
    let second = cache.get("player-john", counting(&calls, "other"), None).await.unwrap();

    assert_eq!(first, "john");
    assert_eq!(second, "john");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_del_forces_recompute() {
    let cache = CacheAside::new(CacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    cache.get("k", counting(&calls, "a"), None).await.unwrap();
    assert!(cache.del("k"));
    let value = cache.get("k", counting(&calls, "b"), None).await.unwrap();

    assert_eq!(value, "b");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_del_starting_with_removes_key_family() {
    let cache = CacheAside::new(CacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    for (key, value) in [
        ("sql.player.getPlayer-john-pc", "john"),
        ("sql.player.getPlayer-jane-pc", "jane"),
        ("other.key", "other"),
    ] {
        cache.get(key, counting(&calls, value), None).await.unwrap();
    }

    let removed = cache.del_starting_with("sql.player.getPlayer");

    assert_eq!(removed, 2);
    assert!(cache.peek("sql.player.getPlayer-john-pc").is_none());
    assert!(cache.peek("sql.player.getPlayer-jane-pc").is_none());
    assert_eq!(cache.peek("other.key").as_deref(), Some("other"));

    let still = cache.get("other.key", counting(&calls, "new"), None).await.unwrap();
    assert_eq!(still, "other");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_compute_failure_propagates_and_is_not_cached() {
    let cache: CacheAside<String> = CacheAside::new(CacheConfig::default());

    let result = cache
        .get("k", || async { Err::<String, _>("upstream down".to_string()) }, None)
        .await;
    assert_eq!(result.unwrap_err(), "upstream down");
    assert!(cache.is_empty());

    let calls = Arc::new(AtomicUsize::new(0));
    let value = cache.get("k", counting(&calls, "ok"), None).await.unwrap();
    assert_eq!(value, "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_put_overwrites_live_entry() {
    let cache = CacheAside::new(CacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    cache.get("k", counting(&calls, "stale"), None).await.unwrap();
    let refreshed = cache.put("k", counting(&calls, "fresh"), None).await.unwrap();

    assert_eq!(refreshed, "fresh");
    assert_eq!(cache.peek("k").as_deref(), Some("fresh"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_entry_expires_after_ttl() {
    let cache = CacheAside::new(CacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let ttl = Some(Duration::from_secs(30));

    cache.get("k", counting(&calls, "a"), ttl).await.unwrap();
    tokio::time::advance(Duration::from_secs(29)).await;
    assert_eq!(cache.peek("k").as_deref(), Some("a"));

    tokio::time::advance(Duration::from_secs(1)).await;
    let value = cache.get("k", counting(&calls, "b"), ttl).await.unwrap();
    assert_eq!(value, "b");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_default_ttl_applies_when_omitted() {
    let cache = CacheAside::new(CacheConfig::default().with_default_ttl_secs(10));
    let calls = Arc::new(AtomicUsize::new(0));

    cache.get("k", counting(&calls, "a"), None).await.unwrap();
    tokio::time::advance(Duration::from_secs(10)).await;

    assert!(cache.peek("k").is_none());
}

#[tokio::test]
async fn test_del_many_and_flush() {
    let cache = CacheAside::new(CacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    for key in ["a", "b", "c", "d"] {
        cache.get(key, counting(&calls, "v"), None).await.unwrap();
    }

    assert_eq!(cache.del_many(["a", "b", "missing"]), 2);
    assert_eq!(cache.len(), 2);

    cache.flush();
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_removes_expired_entries() {
    let cache = Arc::new(CacheAside::new(
        CacheConfig::default().with_sweep_interval_secs(5),
    ));
    let calls = Arc::new(AtomicUsize::new(0));
    cache
        .get("short", counting(&calls, "v"), Some(Duration::from_secs(1)))
        .await
        .unwrap();
    cache
        .get("long", counting(&calls, "v"), Some(Duration::from_secs(600)))
        .await
        .unwrap();

    let handle = cache.spawn_sweeper();
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(cache.len(), 1);
    assert!(cache.peek("long").is_some());

    drop(cache);
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_ttl_caches_without_overflow() {
    let cache = CacheAside::new(CacheConfig::default().with_default_ttl_secs(u64::MAX));
    let calls = Arc::new(AtomicUsize::new(0));

    let first = cache.get("k", counting(&calls, "a"), None).await.unwrap();
    let second = cache
        .get("k", counting(&calls, "b"), Some(Duration::MAX))
        .await
        .unwrap();

    assert_eq!(first, "a");
    assert_eq!(second, "a");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(60 * 60 * 24 * 365)).await;
    assert_eq!(cache.peek("k").as_deref(), Some("a"));
}

#[tokio::test(start_paused = true)]
async fn test_zero_sweep_interval_still_sweeps() {
    let cache = Arc::new(CacheAside::new(
        CacheConfig::default().with_sweep_interval_secs(0),
    ));
    let calls = Arc::new(AtomicUsize::new(0));
    cache
        .get("short", counting(&calls, "v"), Some(Duration::from_millis(500)))
        .await
        .unwrap();

    let handle = cache.spawn_sweeper();
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(cache.is_empty());
    assert!(!handle.is_finished());
    handle.abort();
}
