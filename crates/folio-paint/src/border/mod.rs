//! Border ring and background clip geometry.

mod corner;
mod painter;
mod segment;

pub use corner::{correct, correction_factor, join_metrics, Corner, CornerAngle, JoinMetrics, PathCursor};
pub use painter::BorderPainter;
pub use segment::{sanitize, BorderSegment};
