//! Single-entry memo for the most recent zone polygon.
//!
//! Buffering is the expensive operation and the radius is the only external
//! driver of recomputation, so the cache holds exactly one (radius, polygon)
//! pair. A hit requires the radius bits to match exactly; a hit and a miss
//! are observationally identical except for latency.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::GeometryError;
use crate::zone::buffer::ZonePolygon;

struct CacheEntry {
    radius_bits: u64,
    ticket: u64,
    polygon: Arc<ZonePolygon>,
}

/// Memoizes the last computed buffer polygon keyed by radius.
///
/// Replacement is atomic: readers either see the previous complete entry or
/// the new one, never a half-replaced state. Builds are ticketed so that
/// when requests race, the newest request wins regardless of which build
/// finishes last — a stale build's result is returned to its own caller but
/// never installed over a newer entry.
pub struct ZoneCache {
    entry: RwLock<Option<CacheEntry>>,
    tickets: AtomicU64,
}

impl ZoneCache {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
            tickets: AtomicU64::new(0),
        }
    }

    /// Return the cached polygon if the radius matches exactly.
    pub fn lookup(&self, radius_km: f64) -> Option<Arc<ZonePolygon>> {
        let slot = match self.entry.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.as_ref()
            .filter(|entry| entry.radius_bits == radius_km.to_bits())
            .map(|entry| Arc::clone(&entry.polygon))
    }

    /// Claim a build ticket. Tickets order concurrent builds by request
    /// time.
    pub fn begin(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install a finished build unless a newer ticket got there first.
    /// Always returns a polygon usable by the caller.
    pub fn complete(
        &self,
        ticket: u64,
        radius_km: f64,
        polygon: ZonePolygon,
    ) -> Arc<ZonePolygon> {
        let polygon = Arc::new(polygon);
        let radius_bits = radius_km.to_bits();

        let mut slot = match self.entry.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match slot.as_ref() {
            // Another build for the same radius already landed; hand out the
            // installed polygon so repeated lookups stay bit-identical
            Some(entry) if entry.radius_bits == radius_bits => Arc::clone(&entry.polygon),
            Some(entry) if entry.ticket > ticket => {
                debug!(
                    "Discarding superseded zone build (ticket {} < {})",
                    ticket, entry.ticket
                );
                polygon
            }
            _ => {
                *slot = Some(CacheEntry {
                    radius_bits,
                    ticket,
                    polygon: Arc::clone(&polygon),
                });
                polygon
            }
        }
    }

    /// Fetch the zone for `radius_km`, building it with `build` on a miss.
    pub fn get_or_build<F>(
        &self,
        radius_km: f64,
        build: F,
    ) -> Result<Arc<ZonePolygon>, GeometryError>
    where
        F: FnOnce(f64) -> Result<ZonePolygon, GeometryError>,
    {
        if let Some(hit) = self.lookup(radius_km) {
            return Ok(hit);
        }

        let ticket = self.begin();
        let polygon = build(radius_km)?;
        Ok(self.complete(ticket, radius_km, polygon))
    }
}

impl Default for ZoneCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPath, GeoPoint};
    use crate::zone::buffer::buffer;
    use crate::zone::DEFAULT_STEPS;

    fn test_path() -> GeoPath {
        GeoPath::new(vec![
            GeoPoint::new(59.95, 30.0),
            GeoPoint::new(59.95, 30.3),
        ])
    }

    fn build(radius_km: f64) -> Result<ZonePolygon, GeometryError> {
        buffer(&test_path(), radius_km, DEFAULT_STEPS)
    }

    #[test]
    fn test_hit_returns_same_polygon() {
        let cache = ZoneCache::new();
        let first = cache.get_or_build(10.0, build).unwrap();
        let second = cache.get_or_build(10.0, build).unwrap();
        // Bit-identical: the very same allocation, not a recomputation
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_hit_skips_builder() {
        let cache = ZoneCache::new();
        cache.get_or_build(10.0, build).unwrap();
        let result = cache.get_or_build(10.0, |_| {
            panic!("builder must not run on a cache hit")
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_radius_change_recomputes() {
        let cache = ZoneCache::new();
        let first = cache.get_or_build(10.0, build).unwrap();
        let other = cache.get_or_build(20.0, build).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));

        // Returning to the first radius recomputes (single-entry cache) and
        // yields an equal result
        let again = cache.get_or_build(10.0, build).unwrap();
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(first.ring(), again.ring());
    }

    #[test]
    fn test_build_error_propagates() {
        let cache = ZoneCache::new();
        assert!(matches!(
            cache.get_or_build(-1.0, build),
            Err(GeometryError::InvalidRadius(_))
        ));
        // The failed build left nothing behind
        assert!(cache.lookup(-1.0).is_none());
    }

    #[test]
    fn test_stale_build_does_not_overwrite() {
        let cache = ZoneCache::new();

        // Two requests race: the older one finishes last
        let old_ticket = cache.begin();
        let new_ticket = cache.begin();

        let installed = cache.complete(new_ticket, 20.0, build(20.0).unwrap());
        let stale = cache.complete(old_ticket, 10.0, build(10.0).unwrap());

        // The stale caller still got its own polygon...
        assert_eq!(stale.radius_km(), 10.0);
        // ...but the cache kept the newer entry
        let cached = cache.lookup(20.0).unwrap();
        assert!(Arc::ptr_eq(&cached, &installed));
        assert!(cache.lookup(10.0).is_none());
    }

    #[test]
    fn test_same_radius_race_stays_bit_identical() {
        let cache = ZoneCache::new();

        let first_ticket = cache.begin();
        let second_ticket = cache.begin();

        let winner = cache.complete(first_ticket, 10.0, build(10.0).unwrap());
        let loser = cache.complete(second_ticket, 10.0, build(10.0).unwrap());
        assert!(Arc::ptr_eq(&winner, &loser));
    }
}
