use crate::coords::Point;

use super::Color;

/// Color at offset `t` along the gradient axis, 0 at `start` and 1 at `end`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient in page space.
///
/// Carried through the intermediate format unchanged; the vector backends in
/// this workspace only fill with solid colors and reject gradients.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Point, end: Point, stops: Vec<ColorStop>) -> Self {
        Self { start, end, stops }
    }

    /// At least two finite stops along a non-degenerate axis.
    pub fn is_valid(&self) -> bool {
        self.start != self.end && self.stops.len() >= 2 && self.stops.iter().all(|s| s.t.is_finite())
    }
}
