//! Core data models for the zone engine.

pub mod geo;

pub use geo::{GeoPath, GeoPoint, EARTH_RADIUS_KM};
