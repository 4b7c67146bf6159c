//! Zone lookup service: owns the canonical path and the polygon cache.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::GeometryError;
use crate::models::{GeoPath, GeoPoint};
use crate::zone::buffer::{buffer, ZonePolygon};
use crate::zone::cache::ZoneCache;
use crate::zone::DEFAULT_STEPS;

/// Facade over the buffer builder and cache for one ring-road session.
///
/// The path is validated once at construction and immutable afterwards;
/// the cache is the only mutable state and is safe to share across threads.
pub struct ZoneService {
    path: GeoPath,
    center: GeoPoint,
    steps: u32,
    cache: ZoneCache,
}

impl ZoneService {
    pub fn new(path: GeoPath) -> Result<Self, GeometryError> {
        Self::with_steps(path, DEFAULT_STEPS)
    }

    pub fn with_steps(path: GeoPath, steps: u32) -> Result<Self, GeometryError> {
        if !path.points().iter().all(GeoPoint::is_finite) {
            return Err(GeometryError::NonFinitePath);
        }
        let center = path.center().ok_or(GeometryError::EmptyPath)?;

        info!(
            "Zone service ready: {} centerline vertices, center ({:.4}, {:.4})",
            path.len(),
            center.lat,
            center.lon
        );

        Ok(Self {
            path,
            center,
            steps,
            cache: ZoneCache::new(),
        })
    }

    /// The canonical centerline, for drawing the ring road.
    pub fn path(&self) -> &GeoPath {
        &self.path
    }

    /// Mean vertex of the centerline, for centering the map.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// The zone polygon for `radius_km`, from the cache when fresh.
    pub fn zone(&self, radius_km: f64) -> Result<Arc<ZonePolygon>, GeometryError> {
        self.cache
            .get_or_build(radius_km, |radius| buffer(&self.path, radius, self.steps))
    }

    /// Whether `point` lies within `radius_km` of the centerline.
    ///
    /// Builds (or reuses) the zone polygon for that radius; geometry
    /// failures propagate rather than being reported as "not contained".
    /// Classification of points exactly on the boundary is undefined.
    pub fn contains(&self, point: GeoPoint, radius_km: f64) -> Result<bool, GeometryError> {
        let zone = self.zone(radius_km)?;
        let contained = zone.contains_point(point);
        debug!(
            "Containment check ({:.6}, {:.6}) at r={} km: {}",
            point.lat, point.lon, radius_km, contained
        );
        Ok(contained)
    }
}
