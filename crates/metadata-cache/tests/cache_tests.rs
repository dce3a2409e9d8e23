//! Cache behaviour against an in-memory source and a manual clock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use coverage_common::CoverageError;
use md_parser::MetadataRow;
use metadata_cache::{ArrayMetadataCache, CacheConfig, ManualClock};
use scidb_client::{eo_all_query, MetadataSource, TransportError, TransportResult};
use test_utils::arrays;

/// Serves the sample arrays and records every request.
#[derive(Default)]
struct CountingSource {
    requests: Mutex<Vec<Vec<String>>>,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl CountingSource {
    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }

    fn fetch_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MetadataSource for CountingSource {
    async fn fetch_metadata(&self, names: &[String]) -> TransportResult<Vec<MetadataRow>> {
        eo_all_query(names)?;
        self.requests.lock().unwrap().push(names.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Timeout {
                endpoint: "execute_query",
            });
        }
        Ok(arrays::ALL
            .iter()
            .filter(|r| names.is_empty() || names.iter().any(|n| n == r[0]))
            .map(|r| MetadataRow::from(*r))
            .collect())
    }
}

struct Harness {
    source: Arc<CountingSource>,
    clock: Arc<ManualClock>,
    cache: ArrayMetadataCache,
}

fn harness_with(source: CountingSource, config: CacheConfig) -> Harness {
    let source = Arc::new(source);
    let clock = Arc::new(ManualClock::new());
    let cache = ArrayMetadataCache::with_clock(source.clone(), config, clock.clone());
    Harness {
        source,
        clock,
        cache,
    }
}

fn harness() -> Harness {
    harness_with(CountingSource::default(), CacheConfig::default())
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Freshness
// ============================================================================

#[tokio::test]
async fn test_entry_is_fresh_through_refresh_window() {
    let h = harness();
    h.cache.get("chirps_daily").await.unwrap();

    h.clock.advance_secs(300);
    h.cache.get("chirps_daily").await.unwrap();
    assert_eq!(h.source.fetch_count(), 1);

    h.clock.advance_secs(1);
    h.cache.get("chirps_daily").await.unwrap();
    assert_eq!(h.source.fetch_count(), 2);
}

#[tokio::test]
async fn test_only_misses_are_fetched_in_one_call() {
    let h = harness();
    h.cache.get("plain").await.unwrap();

    let got = h
        .cache
        .get_many(&names(&["ndvi_monthly", "plain", "chirps_daily", "plain"]))
        .await
        .unwrap();
    let got: Vec<&str> = got.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(got, ["ndvi_monthly", "plain", "chirps_daily"]);

    assert_eq!(
        h.source.requests(),
        vec![names(&["plain"]), names(&["ndvi_monthly", "chirps_daily"])]
    );
    let stats = h.cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 3);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let h = harness();
    h.cache.get("plain").await.unwrap();
    assert!(h.cache.invalidate("plain").await);
    assert!(!h.cache.invalidate("plain").await);
    h.cache.get("plain").await.unwrap();
    assert_eq!(h.source.fetch_count(), 2);

    h.cache.invalidate_all().await;
    assert!(h.cache.is_empty().await);
}

// ============================================================================
// Full reload
// ============================================================================

#[tokio::test]
async fn test_empty_request_always_reloads() {
    let h = harness();
    let all = h.cache.get_many(&[]).await.unwrap();
    // the broken sample is skipped by the decoder
    let got: Vec<&str> = all.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(got, ["chirps_daily", "ndvi_monthly", "plain"]);
    assert_eq!(h.cache.len().await, 3);

    h.cache.get_many(&[]).await.unwrap();
    assert_eq!(h.source.requests(), vec![Vec::<String>::new(), Vec::new()]);

    // reloaded entries serve later single lookups
    h.cache.get("ndvi_monthly").await.unwrap();
    assert_eq!(h.source.fetch_count(), 2);
}

// ============================================================================
// Missing and undecodable arrays
// ============================================================================

#[tokio::test]
async fn test_unknown_and_broken_arrays_are_not_found() {
    let h = harness();
    let got = h
        .cache
        .get_many(&names(&["nope", "broken", "plain"]))
        .await
        .unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].name, "plain");

    let err = h.cache.get("broken").await.unwrap_err();
    assert!(matches!(err, CoverageError::ArrayNotFound(n) if n == "broken"));
    assert_eq!(h.cache.cached_names().await, ["plain"]);
}

#[tokio::test]
async fn test_invalid_name_is_a_parameter_error() {
    let h = harness();
    let err = h.cache.get_many(&names(&["plain", "a b"])).await.unwrap_err();
    assert!(matches!(err, CoverageError::InvalidParameter { .. }));
    assert_eq!(err.http_status_code(), 400);
    assert!(h.source.requests().is_empty());
    assert!(h.cache.is_empty().await);
}

// ============================================================================
// Backend failures
// ============================================================================

#[tokio::test]
async fn test_failure_without_entry_is_unavailable() {
    let h = harness();
    h.source.set_failing(true);
    let err = h.cache.get("plain").await.unwrap_err();
    assert!(matches!(err, CoverageError::MetadataUnavailable(_)));
    assert_eq!(err.http_status_code(), 503);
    assert_eq!(h.cache.stats().fetch_failures, 1);
}

#[tokio::test]
async fn test_expired_entry_not_served_without_grace() {
    let h = harness();
    h.cache.get("plain").await.unwrap();
    h.clock.advance_secs(301);
    h.source.set_failing(true);
    assert!(h.cache.get("plain").await.is_err());
}

#[tokio::test]
async fn test_stale_entry_served_within_grace() {
    let h = harness_with(
        CountingSource::default(),
        CacheConfig {
            refresh_after_secs: 300,
            stale_if_error_secs: 60,
        },
    );
    h.cache.get("plain").await.unwrap();
    h.source.set_failing(true);

    h.clock.advance_secs(360);
    let d = h.cache.get("plain").await.unwrap();
    assert_eq!(d.name, "plain");
    assert_eq!(h.cache.stats().stale_served, 1);

    h.clock.advance_secs(1);
    assert!(h.cache.get("plain").await.is_err());
}

#[tokio::test]
async fn test_failed_reload_keeps_entries() {
    let h = harness();
    h.cache.get("plain").await.unwrap();
    h.source.set_failing(true);
    assert!(h.cache.get_many(&[]).await.is_err());
    assert_eq!(h.cache.len().await, 1);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_fetch_once() {
    let h = Arc::new(harness_with(
        CountingSource::slow(Duration::from_millis(50)),
        CacheConfig::default(),
    ));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let h = h.clone();
            tokio::spawn(async move { h.cache.get("chirps_daily").await.map(|d| d.name.clone()) })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), "chirps_daily");
    }
    assert_eq!(h.source.fetch_count(), 1);
}

#[tokio::test]
async fn test_descriptor_memo_survives_cache_hits() {
    let h = harness();
    let first = h.cache.get("chirps_daily").await.unwrap();
    let second = h.cache.get("chirps_daily").await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}
