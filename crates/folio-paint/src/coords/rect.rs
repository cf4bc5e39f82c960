use serde::Serialize;

use super::Point;

/// A box in millipoints: `origin` is its top-left corner when `size` is
/// positive. Border rectangles may arrive with negative extents.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Point,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { origin: Point::new(x, y), size: Point::new(width, height) }
    }

    #[inline]
    pub const fn x(self) -> i32 {
        self.origin.x
    }

    #[inline]
    pub const fn y(self) -> i32 {
        self.origin.y
    }

    #[inline]
    pub const fn width(self) -> i32 {
        self.size.x
    }

    #[inline]
    pub const fn height(self) -> i32 {
        self.size.y
    }

    /// Same area with a non-negative size.
    pub fn normalized(self) -> Self {
        let (x, width) = if self.size.x < 0 {
            (self.origin.x + self.size.x, -self.size.x)
        } else {
            (self.origin.x, self.size.x)
        };
        let (y, height) = if self.size.y < 0 {
            (self.origin.y + self.size.y, -self.size.y)
        } else {
            (self.origin.y, self.size.y)
        };
        Rect::new(x, y, width, height)
    }

    /// The box spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect::new(a.x.min(b.x), a.y.min(b.y), (b.x - a.x).abs(), (b.y - a.y).abs())
    }
}
