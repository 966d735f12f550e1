use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::http::StatusCode;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::json;
use sporlproxy::cache::{BROWSE_CACHE_TTL, CachedResponse, Clock, ResponseCache};

/// Clock that only moves when told to.
struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Arc<Self> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().unwrap();
        Arc::new(Self(Mutex::new(start)))
    }

    fn advance(&self, by: TimeDelta) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn ok(n: usize) -> CachedResponse {
    CachedResponse::new(StatusCode::OK, json!({"status": "SUCCESS", "data": n}))
}

#[tokio::test]
async fn test_second_request_within_ttl_is_served_from_cache() {
    let clock = ManualClock::new();
    let cache = ResponseCache::with_clock(clock.clone());
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    let compute = move || async move {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        ok(n)
    };

    let first = cache.get_or_compute("/api/v1/categories", compute, BROWSE_CACHE_TTL).await;
    clock.advance(TimeDelta::minutes(59));
    let second = cache.get_or_compute("/api/v1/categories", compute, BROWSE_CACHE_TTL).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let clock = ManualClock::new();
    let cache = ResponseCache::with_clock(clock.clone());
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    let compute = move || async move {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        ok(n)
    };

    let first = cache.get_or_compute("k", compute, BROWSE_CACHE_TTL).await;
    clock.advance(BROWSE_CACHE_TTL);
    let second = cache.get_or_compute("k", compute, BROWSE_CACHE_TTL).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(first.body["data"], 0);
    assert_eq!(second.body["data"], 1);
}

#[tokio::test]
async fn test_failures_are_never_cached() {
    let cache = ResponseCache::new();
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    let compute = move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        CachedResponse::new(StatusCode::INTERNAL_SERVER_ERROR, json!({"status": "FAIL"}))
    };

    let first = cache.get_or_compute("k", compute, BROWSE_CACHE_TTL).await;
    let second = cache.get_or_compute("k", compute, BROWSE_CACHE_TTL).await;

    assert_eq!(first.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(second.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
}

#[test]
fn test_keys_are_independent() {
    let cache = ResponseCache::new();
    cache.put("/a", ok(1), BROWSE_CACHE_TTL);
    cache.put("/b", ok(2), BROWSE_CACHE_TTL);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("/a").unwrap().body["data"], 1);
    assert_eq!(cache.get("/b").unwrap().body["data"], 2);
    assert!(cache.get("/c").is_none());
}

#[test]
fn test_put_replaces_existing_entry() {
    let cache = ResponseCache::new();
    cache.put("/a", ok(1), BROWSE_CACHE_TTL);
    cache.put("/a", ok(2), BROWSE_CACHE_TTL);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("/a").unwrap().body["data"], 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_share_one_cache() {
    let cache = Arc::new(ResponseCache::new());

    let handles: Vec<_> = (0..32)
        .map(|n| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                let key = format!("/api/v1/categories?page={n}");
                cache.put(&key, ok(n), BROWSE_CACHE_TTL);
                cache.get(&key)
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let hit = handle.await.unwrap().unwrap();
        assert_eq!(hit.body["data"], n);
    }
    assert_eq!(cache.len(), 32);
}
