use super::bucket::TokenBucket;
use crate::config::RateLimitConfig;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Client key → token bucket map.
///
/// Lookup and first-time creation happen under the same lock, so concurrent
/// first requests for one key always end up sharing a single bucket. Unbounded
/// by default; with `max_tracked_keys` set, the least recently used key is
/// dropped when a new one arrives at capacity.
pub struct BucketRegistry {
    cfg: RateLimitConfig,
    buckets: Mutex<LruCache<String, Arc<TokenBucket>>>,
    created: AtomicU64,
    evicted: AtomicU64,
}

impl BucketRegistry {
    #[must_use]
    pub fn new(cfg: RateLimitConfig) -> Self {
        let buckets = match cfg.max_tracked_keys.and_then(NonZeroUsize::new) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self { cfg, buckets: Mutex::new(buckets), created: AtomicU64::new(0), evicted: AtomicU64::new(0) }
    }

    #[must_use]
    pub const fn config(&self) -> &RateLimitConfig {
        &self.cfg
    }

    /// Returns the bucket for `key`, creating a full one stamped with `now` on first sight.
    pub fn bucket(&self, key: &str, now: Instant) -> Arc<TokenBucket> {
        let mut map = self.buckets.lock();
        if let Some(b) = map.get(key) {
            return Arc::clone(b);
        }
        let bucket = Arc::new(TokenBucket::new(&self.cfg, now));
        if let Some((old_key, _)) = map.push(key.to_string(), Arc::clone(&bucket)) {
            // push hands back the displaced LRU entry; the key itself was absent.
            self.evicted.fetch_add(1, Ordering::Relaxed);
            log::debug!(target: "tasklite::ratelimit", "evicted bucket for key {old_key}");
        }
        drop(map);
        self.created.fetch_add(1, Ordering::Relaxed);
        bucket
    }

    /// Looks up an existing bucket without creating one or touching recency.
    pub fn peek(&self, key: &str) -> Option<Arc<TokenBucket>> {
        self.buckets.lock().peek(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.buckets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.lock().is_empty()
    }

    pub fn buckets_created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }
}

impl Default for BucketRegistry {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
