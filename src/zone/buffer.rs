//! Geodesic buffer construction.
//!
//! The zone polygon is the set of points within `radius_km` of any point on
//! the centerline. It is built explicitly: one capsule (stadium) polygon per
//! segment in the projected plane, unioned into a single outline so that
//! path joints are smoothly covered rather than left as per-segment circle
//! gaps.

use std::f64::consts::PI;

use geo::{Area, BooleanOps, Contains, Coord, LineString, MultiPolygon, Point, Polygon};

use crate::error::GeometryError;
use crate::models::{GeoPath, GeoPoint};
use crate::zone::projection::LocalProjection;

/// Consecutive projected vertices closer than this are collapsed; a
/// zero-length segment has no usable direction.
const MIN_SEGMENT_KM: f64 = 1e-6;

/// The buffered region at a specific radius.
///
/// `ring()` exposes the closed exterior vertex ring for drawing. Containment
/// is tested against the full projected polygon, including any interior void
/// left when the ring road closes on itself at a small radius. Points
/// exactly on the boundary are classified arbitrarily (undefined on
/// boundary).
#[derive(Debug, Clone)]
pub struct ZonePolygon {
    radius_km: f64,
    ring: Vec<GeoPoint>,
    planar: Polygon<f64>,
    projection: LocalProjection,
}

impl ZonePolygon {
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Closed exterior ring (first vertex equals last), lat-first.
    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    /// Whether a point lies inside the buffered region. A non-finite
    /// candidate is never contained.
    pub fn contains_point(&self, point: GeoPoint) -> bool {
        if !point.is_finite() {
            return false;
        }
        let projected = self.projection.project(point);
        self.planar.contains(&Point::from(projected))
    }
}

/// Buffer the path by `radius_km`, producing a single closed zone polygon.
///
/// `steps` is the number of vertices approximating a full circle at caps and
/// joints (values below 8 are clamped up). Fails on an empty or non-finite
/// path, a non-positive radius, or degenerate output geometry.
pub fn buffer(path: &GeoPath, radius_km: f64, steps: u32) -> Result<ZonePolygon, GeometryError> {
    if path.is_empty() {
        return Err(GeometryError::EmptyPath);
    }
    if !path.points().iter().all(GeoPoint::is_finite) {
        return Err(GeometryError::NonFinitePath);
    }
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeometryError::InvalidRadius(radius_km));
    }

    let projection = LocalProjection::for_path(path).ok_or(GeometryError::EmptyPath)?;
    let steps = steps.max(8) as usize;

    // Project into the kilometer plane, collapsing zero-length segments
    let mut vertices: Vec<Coord<f64>> = Vec::with_capacity(path.len());
    for point in path.points() {
        let coord = projection.project(*point);
        if let Some(last) = vertices.last() {
            if (coord.x - last.x).hypot(coord.y - last.y) < MIN_SEGMENT_KM {
                continue;
            }
        }
        vertices.push(coord);
    }

    let capsules: Vec<Polygon<f64>> = if vertices.len() == 1 {
        vec![circle(vertices[0], radius_km, steps)]
    } else {
        vertices
            .windows(2)
            .map(|pair| capsule(pair[0], pair[1], radius_km, steps))
            .collect()
    };

    let mut capsules = capsules.into_iter();
    let first = capsules.next().ok_or(GeometryError::Degenerate)?;
    let mut merged = MultiPolygon::new(vec![first]);
    for capsule in capsules {
        merged = merged.union(&MultiPolygon::new(vec![capsule]));
    }

    // A connected centerline buffers to one polygon; anything extra is
    // numerical debris, so keep the dominant outline
    let zone = merged
        .0
        .into_iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .ok_or(GeometryError::Degenerate)?;

    if zone.exterior().0.len() < 4 {
        return Err(GeometryError::Degenerate);
    }

    let ring: Vec<GeoPoint> = zone
        .exterior()
        .coords()
        .map(|coord| projection.unproject(*coord))
        .collect();

    Ok(ZonePolygon {
        radius_km,
        ring,
        planar: zone,
        projection,
    })
}

/// Discretized circle around a point, `steps` vertices plus the closing one.
fn circle(center: Coord<f64>, radius: f64, steps: usize) -> Polygon<f64> {
    let mut coords = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let angle = 2.0 * PI * i as f64 / steps as f64;
        coords.push(Coord {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        });
    }
    coords.push(coords[0]);
    Polygon::new(LineString::new(coords), vec![])
}

/// Capsule (stadium) polygon around the segment `a -> b`: two semicircular
/// caps of `steps / 2` arc points joined by the straight offset sides.
fn capsule(a: Coord<f64>, b: Coord<f64>, radius: f64, steps: usize) -> Polygon<f64> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = dx.hypot(dy);
    if length < MIN_SEGMENT_KM {
        return circle(a, radius, steps);
    }

    // Angle of the left normal of the segment direction
    let normal_angle = (dy / length).atan2(dx / length) + PI / 2.0;
    let half = (steps / 2).max(4);

    let mut coords = Vec::with_capacity(2 * half + 3);

    // Cap around b: sweep from the left normal through the far side to the
    // right normal
    for i in 0..=half {
        let angle = normal_angle - PI * i as f64 / half as f64;
        coords.push(Coord {
            x: b.x + radius * angle.cos(),
            y: b.y + radius * angle.sin(),
        });
    }
    // Cap around a: continue the sweep back through the near side
    for i in 0..=half {
        let angle = normal_angle - PI - PI * i as f64 / half as f64;
        coords.push(Coord {
            x: a.x + radius * angle.cos(),
            y: a.y + radius * angle.sin(),
        });
    }
    coords.push(coords[0]);

    Polygon::new(LineString::new(coords), vec![])
}
