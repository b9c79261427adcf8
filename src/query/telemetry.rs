use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Slow-query threshold in milliseconds, overridable via
/// `GATHERLY_SLOW_QUERY_MS`.
static SLOW_QUERY_MS: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("GATHERLY_SLOW_QUERY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(500)
});

static QUERIES_TOTAL: AtomicU64 = AtomicU64::new(0);
static QUERIES_SLOW_TOTAL: AtomicU64 = AtomicU64::new(0);

pub fn record_query(collection: &str, took: Duration, result_count: usize) {
    QUERIES_TOTAL.fetch_add(1, Ordering::Relaxed);
    let ms = u64::try_from(took.as_millis()).unwrap_or(u64::MAX);
    if ms >= *SLOW_QUERY_MS {
        QUERIES_SLOW_TOTAL.fetch_add(1, Ordering::Relaxed);
        log::warn!("slow query on {collection}: {ms}ms, {result_count} docs");
    }
}

#[must_use]
pub fn queries_total() -> u64 {
    QUERIES_TOTAL.load(Ordering::Relaxed)
}

#[must_use]
pub fn queries_slow_total() -> u64 {
    QUERIES_SLOW_TOTAL.load(Ordering::Relaxed)
}
