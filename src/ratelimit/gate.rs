use super::registry::BucketRegistry;
use crate::errors::TaskError;
use crate::telemetry::Metrics;
use std::sync::Arc;
use std::time::Instant;

/// Per-request admission checkpoint in front of every handler.
#[derive(Clone)]
pub struct AdmissionGate {
    registry: Arc<BucketRegistry>,
    metrics: Arc<Metrics>,
}

impl AdmissionGate {
    #[must_use]
    pub const fn new(registry: Arc<BucketRegistry>, metrics: Arc<Metrics>) -> Self {
        Self { registry, metrics }
    }

    /// Whether a request from `key` may proceed at `now`. Denial is a normal outcome.
    pub fn admit(&self, key: &str, now: Instant) -> bool {
        let allowed = self.registry.bucket(key, now).try_consume(now);
        self.metrics.record_admission(allowed);
        if !allowed {
            log::warn!(target: "tasklite::ratelimit", "rate limit exceeded for key {key}");
        }
        allowed
    }

    /// Like [`admit`](Self::admit), but a denial becomes `TaskError::RateLimited`
    /// carrying the time until the key's next window.
    ///
    /// # Errors
    /// Returns `TaskError::RateLimited` when the key's bucket is empty.
    pub fn check(&self, key: &str, now: Instant) -> Result<(), TaskError> {
        let bucket = self.registry.bucket(key, now);
        let allowed = bucket.try_consume(now);
        self.metrics.record_admission(allowed);
        if allowed {
            return Ok(());
        }
        let wait = bucket.retry_after(now);
        let retry_after_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        log::warn!(
            target: "tasklite::ratelimit",
            "rate limit exceeded for key {key}; retry after {retry_after_ms}ms"
        );
        Err(TaskError::RateLimited { retry_after_ms })
    }

    #[must_use]
    pub fn registry(&self) -> &BucketRegistry {
        &self.registry
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
