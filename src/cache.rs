//! In-memory caching using moka
//!
//! Distance lookups are paid calls to the mapping provider and the same
//! depot/customer pairs come up all day, so resolved distances are cached.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::distance::DistanceEstimate;

/// Application cache holding resolved distances
#[derive(Clone)]
pub struct AppCache {
    /// Distances (route key -> DistanceEstimate)
    pub distances: Cache<String, Arc<DistanceEstimate>>,
}

impl AppCache {
    /// Create a new cache instance with the given distance TTL
    pub fn new(distance_ttl: Duration) -> Self {
        Self {
            // Distances: 10k routes, idle entries dropped after a quarter of the TTL
            distances: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(distance_ttl)
                .time_to_idle(distance_ttl / 4)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            distances_size: self.distances.entry_count(),
        }
    }

    /// Invalidate all caches. Served by `DELETE /api/pricing/cache` for when
    /// road closures or a provider fix make cached distances stale.
    pub fn invalidate_all(&self) {
        self.distances.invalidate_all();
        info!("All caches invalidated");
    }

    /// Generate cache key for a route. Addresses are trimmed and lowercased so
    /// trivially different spellings share an entry.
    pub fn route_key(origin: &str, destination: &str) -> String {
        format!(
            "route:{}|{}",
            origin.trim().to_lowercase(),
            destination.trim().to_lowercase()
        )
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub distances_size: u64,
}
