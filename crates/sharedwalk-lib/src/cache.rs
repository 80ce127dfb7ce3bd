//! Bounded, process-wide lookup caches for the external providers.
//!
//! Both caches wrap an [`LruCache`] behind a [`parking_lot::Mutex`]. The lock
//! is never held across a provider call, so concurrent requests may race to
//! fill the same key; the writes are idempotent.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::warn;

use crate::geo::{is_reachable, Coordinate, UNREACHABLE};
use crate::provider::{Geocoder, WalkingRouter};

pub const GEOCODE_CACHE_CAPACITY: usize = 100;
pub const DISTANCE_CACHE_CAPACITY: usize = 1000;

/// Hit/miss counters for a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

struct BoundedCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, V>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let bound = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(bound)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        let found = self.entries.lock().get(key).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    fn insert(&self, key: K, value: V) {
        self.entries.lock().put(key, value);
    }

    fn clear(&self) {
        self.entries.lock().clear();
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.lock().len(),
            capacity: self.capacity,
        }
    }
}

/// Memoized address to coordinate lookup.
///
/// Definitive "no match" answers are cached as negative entries. Transient
/// provider failures are not cached, so the next call retries.
pub struct GeocodeCache {
    geocoder: Arc<dyn Geocoder>,
    cache: BoundedCache<String, Option<Coordinate>>,
}

impl GeocodeCache {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_capacity(geocoder, GEOCODE_CACHE_CAPACITY)
    }

    pub fn with_capacity(geocoder: Arc<dyn Geocoder>, capacity: usize) -> Self {
        Self {
            geocoder,
            cache: BoundedCache::new(capacity),
        }
    }

    /// Resolve `address`, returning `None` when it cannot be placed.
    pub fn resolve(&self, address: &str) -> Option<Coordinate> {
        let key = address.to_string();
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        match self.geocoder.geocode(address) {
            Ok(result) => {
                self.cache.insert(key, result);
                result
            }
            Err(err) => {
                warn!(address, error = %err, "geocoding failed");
                None
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// Memoized walking distance between an ordered coordinate pair, in miles.
///
/// Returns [`UNREACHABLE`] when no route exists or the provider fails. Only
/// definitive answers are cached.
pub struct DistanceCache {
    router: Arc<dyn WalkingRouter>,
    cache: BoundedCache<(Coordinate, Coordinate), f64>,
}

impl DistanceCache {
    pub fn new(router: Arc<dyn WalkingRouter>) -> Self {
        Self::with_capacity(router, DISTANCE_CACHE_CAPACITY)
    }

    pub fn with_capacity(router: Arc<dyn WalkingRouter>, capacity: usize) -> Self {
        Self {
            router,
            cache: BoundedCache::new(capacity),
        }
    }

    pub fn walking_distance(&self, from: Coordinate, to: Coordinate) -> f64 {
        let key = (from, to);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        match self.router.walking_distance(from, to) {
            Ok(Some(miles)) if is_reachable(miles) => {
                self.cache.insert(key, miles);
                miles
            }
            Ok(Some(miles)) => {
                warn!(%from, %to, miles, "walking router returned an invalid distance");
                UNREACHABLE
            }
            Ok(None) => {
                self.cache.insert(key, UNREACHABLE);
                UNREACHABLE
            }
            Err(err) => {
                warn!(%from, %to, error = %err, "walking distance lookup failed");
                UNREACHABLE
            }
        }
    }

    /// The router behind this cache, for uncached geometry requests.
    pub fn router(&self) -> &dyn WalkingRouter {
        self.router.as_ref()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// The pair of caches the graph builder needs, constructed once per process.
#[derive(Clone)]
pub struct RoutingCaches {
    pub geocodes: Arc<GeocodeCache>,
    pub distances: Arc<DistanceCache>,
}

impl RoutingCaches {
    pub fn new(geocoder: Arc<dyn Geocoder>, router: Arc<dyn WalkingRouter>) -> Self {
        Self {
            geocodes: Arc::new(GeocodeCache::new(geocoder)),
            distances: Arc::new(DistanceCache::new(router)),
        }
    }
}

impl std::fmt::Debug for RoutingCaches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingCaches")
            .field("geocodes", &self.geocodes.stats())
            .field("distances", &self.distances.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FakeGeocoder, FakeRouter};

    #[test]
    fn geocode_hits_provider_once_per_address() {
        let geocoder = Arc::new(FakeGeocoder::new().with("1 Shields Ave", 38.5382, -121.7617));
        let cache = GeocodeCache::new(geocoder.clone());

        let first = cache.resolve("1 Shields Ave");
        let second = cache.resolve("1 Shields Ave");

        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(geocoder.calls("1 Shields Ave"), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn geocode_caches_definitive_misses() {
        let geocoder = Arc::new(FakeGeocoder::new());
        let cache = GeocodeCache::new(geocoder.clone());

        assert!(cache.resolve("nowhere").is_none());
        assert!(cache.resolve("nowhere").is_none());
        assert_eq!(geocoder.calls("nowhere"), 1);
    }

    #[test]
    fn geocode_retries_after_transient_failure() {
        let geocoder = Arc::new(FakeGeocoder::new().failing("flaky"));
        let cache = GeocodeCache::new(geocoder.clone());

        assert!(cache.resolve("flaky").is_none());
        assert!(cache.resolve("flaky").is_none());
        assert_eq!(geocoder.calls("flaky"), 2);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn geocode_cache_evicts_least_recently_used() {
        let geocoder = Arc::new(
            FakeGeocoder::new()
                .with("a", 1.0, 1.0)
                .with("b", 2.0, 2.0)
                .with("c", 3.0, 3.0),
        );
        let cache = GeocodeCache::with_capacity(geocoder.clone(), 2);

        cache.resolve("a");
        cache.resolve("b");
        cache.resolve("a");
        cache.resolve("c"); // evicts "b"
        cache.resolve("b");

        assert_eq!(geocoder.calls("a"), 1);
        assert_eq!(geocoder.calls("b"), 2);
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn distance_cached_per_ordered_pair() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(2.0, 2.0);
        let router = Arc::new(FakeRouter::new().with_distance(a, b, 1.5));
        let cache = DistanceCache::new(router.clone());

        assert_eq!(cache.walking_distance(a, b), 1.5);
        assert_eq!(cache.walking_distance(a, b), 1.5);
        assert_eq!(router.distance_calls(), 1);

        // The reverse order is a distinct key.
        assert_eq!(cache.walking_distance(b, a), 1.5);
        assert_eq!(router.distance_calls(), 2);
    }

    #[test]
    fn distance_failures_map_to_unreachable_without_caching() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(2.0, 2.0);
        let router = Arc::new(FakeRouter::new().failing_between(a, b));
        let cache = DistanceCache::new(router.clone());

        assert_eq!(cache.walking_distance(a, b), UNREACHABLE);
        assert_eq!(cache.walking_distance(a, b), UNREACHABLE);
        assert_eq!(router.distance_calls(), 2);
    }

    #[test]
    fn missing_route_is_cached_as_unreachable() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(2.0, 2.0);
        let router = Arc::new(FakeRouter::new());
        let cache = DistanceCache::new(router.clone());

        assert_eq!(cache.walking_distance(a, b), UNREACHABLE);
        assert_eq!(cache.walking_distance(a, b), UNREACHABLE);
        assert_eq!(router.distance_calls(), 1);
    }

    /// Geocoder that only answers once `parties` lookups are in flight at
    /// the same time.
    struct RendezvousGeocoder {
        barrier: std::sync::Barrier,
    }

    impl Geocoder for RendezvousGeocoder {
        fn geocode(&self, address: &str) -> Result<Option<Coordinate>, crate::ProviderError> {
            self.barrier.wait();
            let n = address.len() as f64;
            Ok(Some(Coordinate::new(n, -n)))
        }
    }

    #[test]
    fn provider_calls_run_without_holding_the_lock() {
        const THREADS: usize = 4;
        let geocoder = Arc::new(RendezvousGeocoder {
            barrier: std::sync::Barrier::new(THREADS),
        });
        let cache = GeocodeCache::new(geocoder);

        // Every thread blocks inside the provider until all of them are
        // there, which cannot happen if the cache serializes provider calls.
        let results: Vec<Option<Coordinate>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=THREADS)
                .map(|n| {
                    let cache = &cache;
                    scope.spawn(move || cache.resolve(&"x".repeat(n)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, result) in results.into_iter().enumerate() {
            let n = (i + 1) as f64;
            assert_eq!(result, Some(Coordinate::new(n, -n)));
        }
        assert_eq!(cache.stats().entries, THREADS);
    }

    #[test]
    fn concurrent_geocodes_agree_and_respect_capacity() {
        let addresses: Vec<String> = (0..8).map(|i| format!("{i} Main St")).collect();
        let geocoder = addresses
            .iter()
            .enumerate()
            .fold(FakeGeocoder::new(), |g, (i, address)| {
                g.with(address, i as f64, -(i as f64))
            });
        let geocoder = Arc::new(geocoder);
        let cache = Arc::new(GeocodeCache::with_capacity(geocoder.clone(), 4));

        std::thread::scope(|scope| {
            for t in 0..8 {
                let cache = Arc::clone(&cache);
                let addresses = &addresses;
                scope.spawn(move || {
                    for round in 0..20 {
                        let i = (t + round) % addresses.len();
                        let expected = Coordinate::new(i as f64, -(i as f64));
                        assert_eq!(cache.resolve(&addresses[i]), Some(expected));
                        // Same key from every thread.
                        assert_eq!(cache.resolve(&addresses[0]), Some(Coordinate::new(0.0, -0.0)));
                    }
                });
            }
        });

        let stats = cache.stats();
        assert!(stats.entries <= 4);
        assert_eq!(stats.hits + stats.misses, 8 * 20 * 2);
        assert_eq!(geocoder.total_calls() as u64, stats.misses);
    }

    #[test]
    fn concurrent_distances_agree() {
        let points: Vec<Coordinate> = (0..4).map(|i| Coordinate::new(i as f64, 0.0)).collect();
        let mut router = FakeRouter::new();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                router = router.with_distance(*a, *b, (b.lat - a.lat) * 0.5);
            }
        }
        let router = Arc::new(router);
        let cache = DistanceCache::with_capacity(router.clone(), 3);

        std::thread::scope(|scope| {
            for _ in 0..6 {
                scope.spawn(|| {
                    for (i, a) in points.iter().enumerate() {
                        for b in &points[i + 1..] {
                            assert_eq!(cache.walking_distance(*a, *b), (b.lat - a.lat) * 0.5);
                        }
                    }
                });
            }
        });

        let stats = cache.stats();
        assert!(stats.entries <= 3);
        assert!(router.distance_calls() >= 6);
        assert_eq!(router.distance_calls() as u64, stats.misses);
    }

    #[test]
    fn negative_distance_is_rejected() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(2.0, 2.0);
        let router = Arc::new(FakeRouter::new().with_distance(a, b, -3.0));
        let cache = DistanceCache::new(router);

        assert_eq!(cache.walking_distance(a, b), UNREACHABLE);
    }
}
