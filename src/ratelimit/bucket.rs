use crate::config::RateLimitConfig;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct BucketState {
    tokens: u64,
    last_refill: Instant,
}

/// Fixed-window token bucket.
///
/// Every completed window grants `refill_tokens` at once (capped at `capacity`);
/// nothing is replenished mid-window. All state changes happen under one mutex,
/// so `try_consume` is linearizable per bucket.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u64,
    refill_tokens: u64,
    window: Duration,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// A full bucket whose first window starts at `now`.
    #[must_use]
    pub fn new(cfg: &RateLimitConfig, now: Instant) -> Self {
        let capacity = cfg.capacity.max(1);
        Self {
            capacity,
            refill_tokens: cfg.refill_tokens,
            window: cfg.window().max(Duration::from_nanos(1)),
            state: Mutex::new(BucketState { tokens: capacity, last_refill: now }),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Takes one token if available. Returns `false` when the bucket is empty.
    pub fn try_consume(&self, now: Instant) -> bool {
        let mut st = self.state.lock();
        self.refill(&mut st, now);
        if st.tokens >= 1 {
            st.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens left after applying any refill due at `now`.
    pub fn available(&self, now: Instant) -> u64 {
        let mut st = self.state.lock();
        self.refill(&mut st, now);
        st.tokens
    }

    /// Time until a token becomes available; zero if one is available now.
    pub fn retry_after(&self, now: Instant) -> Duration {
        let mut st = self.state.lock();
        self.refill(&mut st, now);
        if st.tokens >= 1 {
            return Duration::ZERO;
        }
        if self.refill_tokens == 0 {
            return Duration::MAX;
        }
        let into_window = now.saturating_duration_since(st.last_refill);
        self.window.saturating_sub(into_window)
    }

    fn refill(&self, st: &mut BucketState, now: Instant) {
        let elapsed = now.saturating_duration_since(st.last_refill);
        let window_ns = self.window.as_nanos();
        let windows = elapsed.as_nanos() / window_ns;
        if windows == 0 {
            return;
        }
        let granted = u64::try_from(windows).unwrap_or(u64::MAX).saturating_mul(self.refill_tokens);
        st.tokens = st.tokens.saturating_add(granted).min(self.capacity);
        // Advance by whole windows only, so boundaries never drift.
        let remainder = u64::try_from(elapsed.as_nanos() % window_ns).unwrap_or(0);
        st.last_refill = now.checked_sub(Duration::from_nanos(remainder)).unwrap_or(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(now: Instant) -> TokenBucket {
        TokenBucket::new(&RateLimitConfig::default(), now)
    }

    #[test]
    fn fresh_bucket_allows_exactly_capacity() {
        let t0 = Instant::now();
        let b = bucket(t0);
        for i in 0..100 {
            assert!(b.try_consume(t0), "call {i} should pass");
        }
        assert!(!b.try_consume(t0));
        assert_eq!(b.available(t0), 0);
    }

    #[test]
    fn no_partial_refill_mid_window() {
        let t0 = Instant::now();
        let b = bucket(t0);
        for _ in 0..100 {
            b.try_consume(t0);
        }
        assert!(!b.try_consume(t0 + Duration::from_secs(59)));
        assert_eq!(b.available(t0 + Duration::from_secs(59)), 0);
    }

    #[test]
    fn full_window_resets_to_capacity() {
        let t0 = Instant::now();
        let b = bucket(t0);
        for _ in 0..100 {
            b.try_consume(t0);
        }
        let t1 = t0 + Duration::from_secs(60);
        assert!(b.try_consume(t1));
        assert_eq!(b.available(t1), 99);
    }

    #[test]
    fn window_boundaries_stay_aligned() {
        let t0 = Instant::now();
        let b = bucket(t0);
        for _ in 0..100 {
            b.try_consume(t0);
        }
        // Refill at 90s belongs to the window that started at 60s.
        assert!(b.try_consume(t0 + Duration::from_secs(90)));
        for _ in 0..99 {
            b.try_consume(t0 + Duration::from_secs(90));
        }
        assert!(!b.try_consume(t0 + Duration::from_secs(119)));
        assert!(b.try_consume(t0 + Duration::from_secs(120)));
    }

    #[test]
    fn earlier_timestamps_do_not_refill() {
        let t0 = Instant::now() + Duration::from_secs(5);
        let b = bucket(t0);
        for _ in 0..100 {
            b.try_consume(t0);
        }
        assert!(!b.try_consume(t0 - Duration::from_secs(5)));
    }

    #[test]
    fn retry_after_counts_down_to_next_window() {
        let t0 = Instant::now();
        let b = bucket(t0);
        assert_eq!(b.retry_after(t0), Duration::ZERO);
        for _ in 0..100 {
            b.try_consume(t0);
        }
        assert_eq!(b.retry_after(t0 + Duration::from_secs(15)), Duration::from_secs(45));
    }

    #[test]
    fn refill_is_capped_by_capacity() {
        let cfg = RateLimitConfig { capacity: 10, refill_tokens: 4, ..RateLimitConfig::default() };
        let t0 = Instant::now();
        let b = TokenBucket::new(&cfg, t0);
        for _ in 0..8 {
            b.try_consume(t0);
        }
        assert_eq!(b.available(t0 + Duration::from_secs(60)), 6);
        assert_eq!(b.available(t0 + Duration::from_secs(600)), 10);
    }
}
