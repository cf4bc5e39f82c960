//! Coordinate and geometry types shared by the border engine and backends.
//!
//! Canonical page space:
//! - Millipoints (1/1000 pt), integer
//! - Origin top-left
//! - +X right, +Y down
//!
//! Backends convert to their own unit and orientation when writing output.

mod point;
mod rect;

pub use point::Point;
pub use rect::Rect;

/// Millipoints per point.
pub const MPT_PER_PT: f64 = 1000.0;
