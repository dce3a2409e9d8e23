//! Per-array metadata cache.
//!
//! Each entry is a decoded [`ArrayDescriptor`] together with the instant it
//! was fetched. A lookup of one or more names is a single transaction per
//! name: the names' locks are held while the entries are checked, the
//! misses are fetched from the backend in one call and the results are
//! stored. Two callers missing on the same name therefore cause one fetch.
//!
//! ## Metrics
//!
//! - `mdcache_hits_total` / `mdcache_misses_total`
//! - `mdcache_fetches_total` / `mdcache_fetch_failures_total`
//! - `mdcache_stale_served_total`

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use coverage_common::{ArrayDescriptor, CoverageError, CoverageResult};
use md_parser::decode_batch;
use metrics::counter;
use scidb_client::{MetadataSource, TransportError};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;

struct CachedArray {
    descriptor: Arc<ArrayDescriptor>,
    fetched_at: Instant,
}

/// Counters for the metadata cache.
#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
    fetch_failures: AtomicU64,
    stale_served: AtomicU64,
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Backend calls, successful or not.
    pub fetches: u64,
    pub fetch_failures: u64,
    pub stale_served: u64,
}

impl CacheStats {
    /// Hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Cache of decoded array metadata in front of a [`MetadataSource`].
pub struct ArrayMetadataCache {
    source: Arc<dyn MetadataSource>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    entries: RwLock<HashMap<String, CachedArray>>,
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    reload_lock: Mutex<()>,
    counters: Counters,
}

impl ArrayMetadataCache {
    pub fn new(source: Arc<dyn MetadataSource>, config: CacheConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn MetadataSource>,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            clock,
            config,
            entries: RwLock::new(HashMap::new()),
            key_locks: Mutex::new(HashMap::new()),
            reload_lock: Mutex::new(()),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Descriptors for `names`, in request order.
    ///
    /// Names the backend does not know, and arrays whose metadata cannot be
    /// decoded, are absent from the result. An empty list reloads every
    /// array from the backend and returns all of them.
    #[instrument(skip(self), fields(count = names.len()))]
    pub async fn get_many(&self, names: &[String]) -> CoverageResult<Vec<Arc<ArrayDescriptor>>> {
        if names.is_empty() {
            return self.reload_all().await;
        }

        let mut seen = HashSet::new();
        let requested: Vec<&String> = names.iter().filter(|n| seen.insert(*n)).collect();

        let guards = self.lock_keys(&requested).await;
        let result = self.resolve_locked(&requested).await;
        drop(guards);
        self.prune_key_locks().await;

        let mut found = result?;
        Ok(requested
            .into_iter()
            .filter_map(|name| found.remove(name))
            .collect())
    }

    /// Descriptor of a single array.
    pub async fn get(&self, name: &str) -> CoverageResult<Arc<ArrayDescriptor>> {
        let names = [name.to_string()];
        self.get_many(&names)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoverageError::ArrayNotFound(name.to_string()))
    }

    /// Drop one entry; the next lookup goes to the backend.
    pub async fn invalidate(&self, name: &str) -> bool {
        let removed = self.entries.write().await.remove(name).is_some();
        if removed {
            debug!(array = %name, "Invalidated cache entry");
        }
        removed
    }

    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        info!(count = count, "Invalidated all cache entries");
    }

    /// Number of cached entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Names currently cached, sorted.
    pub async fn cached_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            fetch_failures: self.counters.fetch_failures.load(Ordering::Relaxed),
            stale_served: self.counters.stale_served.load(Ordering::Relaxed),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Check, fetch and store `requested`; the caller holds their locks.
    async fn resolve_locked(
        &self,
        requested: &[&String],
    ) -> CoverageResult<HashMap<String, Arc<ArrayDescriptor>>> {
        let now = self.clock.now();
        let refresh_after = self.config.refresh_after();
        let mut found = HashMap::new();
        let mut missing: Vec<String> = Vec::new();

        {
            let entries = self.entries.read().await;
            for &name in requested {
                match entries.get(name) {
                    Some(entry) if now.saturating_duration_since(entry.fetched_at) <= refresh_after => {
                        found.insert(name.clone(), entry.descriptor.clone());
                    }
                    _ => missing.push(name.clone()),
                }
            }
        }

        self.record_lookups(found.len() as u64, missing.len() as u64);
        if missing.is_empty() {
            return Ok(found);
        }

        debug!(
            hits = found.len(),
            misses = missing.len(),
            "Fetching missing arrays from backend"
        );

        match self.fetch(&missing).await {
            Ok(arrays) => {
                let mut fetched: HashMap<String, Arc<ArrayDescriptor>> = arrays
                    .into_iter()
                    .map(|a| (a.name.clone(), Arc::new(a)))
                    .collect();
                let fetched_at = self.clock.now();

                let mut entries = self.entries.write().await;
                for name in missing {
                    match fetched.remove(&name) {
                        Some(descriptor) => {
                            entries.insert(
                                name.clone(),
                                CachedArray {
                                    descriptor: descriptor.clone(),
                                    fetched_at,
                                },
                            );
                            found.insert(name, descriptor);
                        }
                        None => {
                            if entries.remove(&name).is_some() {
                                debug!(array = %name, "Dropped expired entry absent from backend");
                            }
                        }
                    }
                }
                Ok(found)
            }
            Err(TransportError::InvalidArrayName(name)) => Err(CoverageError::invalid_parameter(
                "coverage",
                format!("'{}' is not a valid array name", name),
            )),
            Err(err) => {
                let max_age = self.config.max_stale_age();
                let entries = self.entries.read().await;
                let mut unresolved = Vec::new();

                for name in missing {
                    match entries.get(&name) {
                        Some(entry) if now.saturating_duration_since(entry.fetched_at) <= max_age => {
                            warn!(array = %name, error = %err, "Serving stale metadata after backend failure");
                            self.counters.stale_served.fetch_add(1, Ordering::Relaxed);
                            counter!("mdcache_stale_served_total").increment(1);
                            found.insert(name, entry.descriptor.clone());
                        }
                        _ => unresolved.push(name),
                    }
                }

                if unresolved.is_empty() {
                    Ok(found)
                } else {
                    Err(CoverageError::MetadataUnavailable(format!(
                        "{}: {}",
                        unresolved.join(", "),
                        err
                    )))
                }
            }
        }
    }

    /// Fetch and decode; failures are counted and logged here.
    async fn fetch(&self, names: &[String]) -> Result<Vec<ArrayDescriptor>, TransportError> {
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        counter!("mdcache_fetches_total").increment(1);
        let start = Instant::now();

        let rows = match self.source.fetch_metadata(names).await {
            Ok(rows) => rows,
            Err(e) => {
                self.counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                counter!("mdcache_fetch_failures_total").increment(1);
                warn!(error = %e, requested = names.len(), "Metadata fetch failed");
                return Err(e);
            }
        };

        let batch = decode_batch(&rows);
        debug!(
            rows = rows.len(),
            decoded = batch.arrays.len(),
            skipped = batch.skipped.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched metadata"
        );
        Ok(batch.arrays)
    }

    async fn reload_all(&self) -> CoverageResult<Vec<Arc<ArrayDescriptor>>> {
        let _reload = self.reload_lock.lock().await;
        self.record_lookups(0, 1);

        let arrays = self
            .fetch(&[])
            .await
            .map_err(|e| CoverageError::MetadataUnavailable(e.to_string()))?;

        let fetched_at = self.clock.now();
        let mut descriptors: Vec<Arc<ArrayDescriptor>> = arrays.into_iter().map(Arc::new).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));

        let mut entries = self.entries.write().await;
        for descriptor in &descriptors {
            entries.insert(
                descriptor.name.clone(),
                CachedArray {
                    descriptor: descriptor.clone(),
                    fetched_at,
                },
            );
        }
        info!(arrays = descriptors.len(), "Reloaded all array metadata");
        Ok(descriptors)
    }

    /// Acquire the locks for `names` in sorted order.
    async fn lock_keys(&self, names: &[&String]) -> Vec<OwnedMutexGuard<()>> {
        let mut sorted: Vec<&String> = names.to_vec();
        sorted.sort();

        let locks: Vec<Arc<Mutex<()>>> = {
            let mut map = self.key_locks.lock().await;
            sorted
                .into_iter()
                .map(|name| map.entry(name.clone()).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(locks.len());
        for lock in locks {
            guards.push(lock.lock_owned().await);
        }
        guards
    }

    async fn prune_key_locks(&self) {
        let mut map = self.key_locks.lock().await;
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    fn record_lookups(&self, hits: u64, misses: u64) {
        self.counters.hits.fetch_add(hits, Ordering::Relaxed);
        self.counters.misses.fetch_add(misses, Ordering::Relaxed);
        counter!("mdcache_hits_total").increment(hits);
        counter!("mdcache_misses_total").increment(misses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 75.0);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
