use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Process counters. Owned by whoever wires the service together and shared via `Arc`.
#[derive(Default, Debug)]
pub struct Metrics {
    pub requests_admitted_total: AtomicU64,
    pub requests_rate_limited_total: AtomicU64,
    pub queries_total: AtomicU64,
    pub writes_total: AtomicU64,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_admission(&self, allowed: bool) {
        let counter =
            if allowed { &self.requests_admitted_total } else { &self.requests_rate_limited_total };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn rate_limited(&self) -> u64 {
        self.requests_rate_limited_total.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn admitted(&self) -> u64 {
        self.requests_admitted_total.load(Ordering::Relaxed)
    }

    /// OpenMetrics/Prometheus exposition format (no types/HELP for brevity)
    #[must_use]
    pub fn metrics_text(&self, buckets_tracked: usize, buckets_created: u64) -> String {
        format!(
            "tasklite_requests_admitted_total {}\n\
             tasklite_requests_rate_limited_total {}\n\
             tasklite_queries_total {}\n\
             tasklite_writes_total {}\n\
             tasklite_rate_limit_buckets {}\n\
             tasklite_buckets_created_total {}\n",
            self.requests_admitted_total.load(Ordering::Relaxed),
            self.requests_rate_limited_total.load(Ordering::Relaxed),
            self.queries_total.load(Ordering::Relaxed),
            self.writes_total.load(Ordering::Relaxed),
            buckets_tracked,
            buckets_created,
        )
    }
}

fn now_ts() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Builds the JSON line written to the audit log for a write.
#[must_use]
pub fn audit_line(op: &str, task_id: &str, actor: Option<&str>) -> String {
    serde_json::json!({
        "ts": now_ts(),
        "op": op,
        "task_id": task_id,
        "actor": actor,
    })
    .to_string()
}

pub fn log_audit(metrics: &Metrics, op: &str, task_id: &str, actor: Option<&str>) {
    metrics.writes_total.fetch_add(1, Ordering::Relaxed);
    log::info!(target: "tasklite::audit", "{}", audit_line(op, task_id, actor));
}

pub fn log_query(metrics: &Metrics, fingerprint: &str, result_count: usize, took: Duration) {
    metrics.queries_total.fetch_add(1, Ordering::Relaxed);
    log::info!(
        "query fingerprint={fingerprint} results={result_count} duration_ms={}",
        u64::try_from(took.as_millis()).unwrap_or(u64::MAX)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_counters_split_by_outcome() {
        let m = Metrics::new();
        m.record_admission(true);
        m.record_admission(true);
        m.record_admission(false);
        assert_eq!(m.admitted(), 2);
        assert_eq!(m.rate_limited(), 1);
        let text = m.metrics_text(7, 9);
        assert!(text.contains("tasklite_requests_admitted_total 2"));
        assert!(text.contains("tasklite_requests_rate_limited_total 1"));
        assert!(text.contains("tasklite_rate_limit_buckets 7"));
        assert!(text.contains("tasklite_buckets_created_total 9"));
    }

    #[test]
    fn audit_line_is_json() {
        let line = audit_line("delete", "abc", Some("system"));
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["op"], "delete");
        assert_eq!(v["task_id"], "abc");
        assert_eq!(v["actor"], "system");
    }

    #[test]
    fn log_audit_counts_writes() {
        let m = Metrics::new();
        log_audit(&m, "create", "x", None);
        assert_eq!(m.writes_total.load(Ordering::Relaxed), 1);
    }
}
