//! Local azimuthal equidistant projection.
//!
//! Buffering happens in a plane with kilometer units so a single radius
//! value is meaningful everywhere along the path; at these latitudes a raw
//! degree is ~111 km north-south but only ~56 km east-west, so flat-plane
//! buffering of degree coordinates would be badly skewed. The projection is
//! centered on the path and shared between the buffer builder and the
//! containment tester, which keeps their boundaries in agreement.
//!
//! Distances from the projection origin are exact on the sphere; chord
//! distances between nearby points are accurate to well under the arc
//! discretization error for zones up to a few hundred kilometers across.

use geo::Coord;

use crate::models::{GeoPath, GeoPoint, EARTH_RADIUS_KM};

/// Spherical azimuthal equidistant projection centered on a fixed origin.
/// Forward maps degrees to a kilometer plane; inverse maps back.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    lat0: f64,
    lon0: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl LocalProjection {
    pub fn centered_at(origin: GeoPoint) -> Self {
        let lat0 = origin.lat.to_radians();
        Self {
            lat0,
            lon0: origin.lon.to_radians(),
            sin_lat0: lat0.sin(),
            cos_lat0: lat0.cos(),
        }
    }

    /// Projection centered on the path's mean vertex. `None` for an empty
    /// path.
    pub fn for_path(path: &GeoPath) -> Option<Self> {
        path.center().map(Self::centered_at)
    }

    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.lat0.to_degrees(), self.lon0.to_degrees())
    }

    /// Forward projection: degrees to kilometers in the local plane.
    pub fn project(&self, point: GeoPoint) -> Coord<f64> {
        let lat = point.lat.to_radians();
        let dlon = point.lon.to_radians() - self.lon0;

        let cos_c = self.sin_lat0 * lat.sin() + self.cos_lat0 * lat.cos() * dlon.cos();
        let c = cos_c.clamp(-1.0, 1.0).acos();

        // c / sin(c) -> 1 as c -> 0
        let k = if c.abs() < 1e-12 { 1.0 } else { c / c.sin() };
        let scale = EARTH_RADIUS_KM * k;

        Coord {
            x: scale * lat.cos() * dlon.sin(),
            y: scale * (self.cos_lat0 * lat.sin() - self.sin_lat0 * lat.cos() * dlon.cos()),
        }
    }

    /// Inverse projection: kilometers in the local plane back to degrees.
    pub fn unproject(&self, coord: Coord<f64>) -> GeoPoint {
        let rho = coord.x.hypot(coord.y);
        if rho < 1e-12 {
            return self.origin();
        }

        let c = rho / EARTH_RADIUS_KM;
        let (sin_c, cos_c) = c.sin_cos();

        let lat = (cos_c * self.sin_lat0 + coord.y * sin_c * self.cos_lat0 / rho).asin();
        let lon = self.lon0
            + (coord.x * sin_c)
                .atan2(rho * self.cos_lat0 * cos_c - coord.y * self.sin_lat0 * sin_c);

        GeoPoint::new(lat.to_degrees(), lon.to_degrees())
    }
}
