//! In-memory TTL cache for anonymous browse responses.
//!
//! Entries are keyed by route path plus the sorted query string and expire a
//! fixed time after they were written. There is no eviction beyond expiry and
//! no invalidation API. Only `200 OK` results are ever stored, so a failed
//! upstream call is retried by the next request instead of being replayed
//! for an hour.

use std::{collections::BTreeMap, future::Future, sync::Arc};

use axum::http::StatusCode;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use serde_json::Value;

/// TTL of the cached browse endpoints.
pub const BROWSE_CACHE_TTL: TimeDelta = TimeDelta::hours(1);

/// Time source of the cache. Swappable so expiry can be tested without
/// sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A rendered response: HTTP status plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl CachedResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedResponse,
    expires_at: DateTime<Utc>,
}

pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Cache key for a route: the path followed by the query pairs in key
    /// order, so `?b=2&a=1` and `?a=1&b=2` share an entry.
    pub fn key(path: &str, query: &BTreeMap<String, String>) -> String {
        if query.is_empty() {
            return path.to_string();
        }

        let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{path}?{}", pairs.join("&"))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Returns the entry for `key` while it is still live.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        let now = self.now();
        self.entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key` for `ttl`. Anything but `200 OK` is ignored.
    /// An existing entry is replaced wholesale.
    pub fn put(&self, key: &str, value: CachedResponse, ttl: TimeDelta) {
        if value.status != StatusCode::OK {
            return;
        }

        let expires_at = self.now() + ttl;
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// Serves `key` from the cache, or runs `compute`, stores its result when
    /// it is a 200, and returns it either way.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F, ttl: TimeDelta) -> CachedResponse
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachedResponse>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(key, "cache hit");
            return hit;
        }

        let fresh = compute().await;
        self.put(key, fresh.clone(), ttl);
        fresh
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_sorts_query_pairs() {
        let mut query = BTreeMap::new();
        query.insert("offset".to_string(), "0".to_string());
        query.insert("limit".to_string(), "5".to_string());

        assert_eq!(
            ResponseCache::key("/api/v1/categories", &query),
            "/api/v1/categories?limit=5&offset=0"
        );
        assert_eq!(
            ResponseCache::key("/api/v1/categories", &BTreeMap::new()),
            "/api/v1/categories"
        );
    }

    #[test]
    fn put_ignores_non_ok() {
        let cache = ResponseCache::new();
        cache.put(
            "k",
            CachedResponse::new(StatusCode::UNAUTHORIZED, Value::Null),
            BROWSE_CACHE_TTL,
        );
        assert!(cache.is_empty());
        assert!(cache.get("k").is_none());
    }
}
