//! Delivery zone construction and containment.
//!
//! Buffers the ring-road centerline by a radius into a closed polygon and
//! answers point-in-zone queries, memoizing the most recent polygon per
//! radius.

mod buffer;
mod cache;
mod projection;
mod service;

pub use buffer::{buffer, ZonePolygon};
pub use cache::ZoneCache;
pub use projection::LocalProjection;
pub use service::ZoneService;

/// Angular resolution for circular arcs in the buffer outline: the number of
/// vertices used to approximate a full circle. Higher values produce a
/// smoother polygon at the cost of more vertices.
pub const DEFAULT_STEPS: u32 = 128;
