//! Geographic primitives.
//!
//! The canonical convention throughout the crate is latitude-first.
//! Longitude-first pairs exist only at the decode boundary (the encoded path
//! stores `lon,lat`) and inside the projection math.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers (spherical approximation).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic point (lat/lon, WGS84 decimal degrees).
///
/// Equality is exact value comparison; there is no implicit epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Great-circle distance to another point in kilometers.
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Ordered polyline of geographic points (the ring-road centerline).
///
/// Immutable after construction; vertex order is preserved. Emptiness is
/// representable here but rejected by the buffer builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPath(Vec<GeoPoint>);

impl GeoPath {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean of the vertices, used by the map collaborator for
    /// initial centering. `None` for an empty path.
    pub fn center(&self) -> Option<GeoPoint> {
        if self.0.is_empty() {
            return None;
        }
        let n = self.0.len() as f64;
        let sum_lat: f64 = self.0.iter().map(|p| p.lat).sum();
        let sum_lon: f64 = self.0.iter().map(|p| p.lon).sum();
        Some(GeoPoint::new(sum_lat / n, sum_lon / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = GeoPoint::new(59.0, 30.0);
        let b = GeoPoint::new(60.0, 30.0);
        // One degree of latitude is ~111.2 km on a 6371 km sphere
        let d = a.haversine_km(&b);
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let a = GeoPoint::new(59.93, 30.33);
        assert_eq!(a.haversine_km(&a), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = GeoPoint::new(59.93, 30.33);
        let b = GeoPoint::new(60.1, 29.8);
        assert!((a.haversine_km(&b) - b.haversine_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_center_is_vertex_mean() {
        let path = GeoPath::new(vec![
            GeoPoint::new(59.0, 30.0),
            GeoPoint::new(61.0, 31.0),
        ]);
        let center = path.center().unwrap();
        assert_eq!(center.lat, 60.0);
        assert_eq!(center.lon, 30.5);
    }

    #[test]
    fn test_center_empty_path() {
        assert!(GeoPath::new(vec![]).center().is_none());
    }
}
