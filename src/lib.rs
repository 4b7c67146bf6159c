//! Ringzone - delivery zone computation around a fixed ring-road polyline
//!
//! This library decodes the ring-road centerline from its compact
//! relative-offset encoding, buffers it by a radius into a closed zone
//! polygon, and answers point-in-zone queries for candidate addresses.

pub mod decode;
pub mod error;
pub mod models;
pub mod ring_road;
pub mod zone;

pub use error::{FormatError, GeometryError};
pub use models::{GeoPath, GeoPoint};
pub use zone::{ZonePolygon, ZoneService, DEFAULT_STEPS};
