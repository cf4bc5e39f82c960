//! Corner geometry shared by the border ring and the background clip.

use std::f64::consts::{FRAC_PI_2, PI};
use std::io;

use crate::coords::Point;
use crate::graphics::GraphicsPainter;

use super::segment::BorderSegment;

/// The quarter of an ellipse a corner covers, named after the two edges it
/// joins. Angles follow the +Y-down convention of [`GraphicsPainter::arc_to`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CornerAngle {
    /// Top-left: π → 3π/2.
    StartBefore,
    /// Top-right: 3π/2 → 2π.
    BeforeEnd,
    /// Bottom-right: 0 → π/2.
    EndAfter,
    /// Bottom-left: π/2 → π.
    AfterStart,
}

impl CornerAngle {
    pub fn start(self) -> f64 {
        match self {
            CornerAngle::StartBefore => PI,
            CornerAngle::BeforeEnd => 1.5 * PI,
            CornerAngle::EndAfter => 0.0,
            CornerAngle::AfterStart => FRAC_PI_2,
        }
    }

    #[inline]
    pub fn end(self) -> f64 {
        self.start() + FRAC_PI_2
    }

    /// Direction from the box corner to the ellipse center.
    fn center_signs(self) -> (i32, i32) {
        match self {
            CornerAngle::StartBefore => (1, 1),
            CornerAngle::BeforeEnd => (-1, 1),
            CornerAngle::EndAfter => (-1, -1),
            CornerAngle::AfterStart => (1, -1),
        }
    }
}

/// One rounded (or square) corner.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Corner {
    pub radius_x: i32,
    pub radius_y: i32,
    pub angle: CornerAngle,
}

impl Corner {
    /// A negative radius collapses to zero.
    #[inline]
    pub fn new(radius_x: i32, radius_y: i32, angle: CornerAngle) -> Self {
        Self { radius_x: radius_x.max(0), radius_y: radius_y.max(0), angle }
    }

    #[inline]
    pub const fn square(angle: CornerAngle) -> Self {
        Self { radius_x: 0, radius_y: 0, angle }
    }

    /// Both radii non-zero: the corner is drawn as an arc.
    #[inline]
    pub fn is_elliptic(&self) -> bool {
        self.radius_x > 0 && self.radius_y > 0
    }

    /// Ellipse center for a corner sitting at box corner `at`.
    pub fn center(&self, at: Point) -> Point {
        if !self.is_elliptic() {
            return at;
        }
        let (sx, sy) = self.angle.center_signs();
        at.offset(sx * self.radius_x, sy * self.radius_y)
    }

    /// Where a clockwise walk enters the corner.
    pub fn entry(&self, at: Point) -> Point {
        self.point_at(at, self.angle.start())
    }

    /// Where a clockwise walk leaves the corner.
    pub fn exit(&self, at: Point) -> Point {
        self.point_at(at, self.angle.end())
    }

    fn point_at(&self, at: Point, angle: f64) -> Point {
        if !self.is_elliptic() {
            return at;
        }
        let c = self.center(at);
        Point::new(
            c.x + (self.radius_x as f64 * angle.cos()).round() as i32,
            c.y + (self.radius_y as f64 * angle.sin()).round() as i32,
        )
    }
}

/// Current point of a path being walked clockwise around a box.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PathCursor {
    pub x: i32,
    pub y: i32,
}

impl PathCursor {
    pub fn move_to<G>(painter: &mut G, p: Point) -> io::Result<Self>
    where
        G: GraphicsPainter + ?Sized,
    {
        painter.move_to(p.x, p.y)?;
        Ok(Self { x: p.x, y: p.y })
    }

    /// Straight segment to `p`; a zero-length segment is not emitted.
    pub fn line_to<G>(self, painter: &mut G, p: Point) -> io::Result<Self>
    where
        G: GraphicsPainter + ?Sized,
    {
        if (self.x, self.y) != (p.x, p.y) {
            painter.line_to(p.x, p.y)?;
        }
        Ok(Self { x: p.x, y: p.y })
    }

    /// Walks through `corner` placed at box corner `at`: a line to its entry
    /// point followed by the quarter arc when the corner is elliptic.
    pub fn corner<G>(self, painter: &mut G, corner: &Corner, at: Point) -> io::Result<Self>
    where
        G: GraphicsPainter + ?Sized,
    {
        let cursor = self.line_to(painter, corner.entry(at))?;
        if !corner.is_elliptic() {
            return Ok(cursor);
        }
        let c = corner.center(at);
        painter.arc_to(
            corner.angle.start(),
            corner.angle.end(),
            c.x,
            c.y,
            corner.radius_x,
            corner.radius_y,
        )?;
        let exit = corner.exit(at);
        Ok(Self { x: exit.x, y: exit.y })
    }
}

/// Largest factor `≤ 1` by which all radii must be scaled so that the two
/// radii along any edge fit within that edge.
///
/// The before/after radii are measured against `width`, the start/end radii
/// against `height`.
pub fn correction_factor(
    width: i32,
    height: i32,
    before: &BorderSegment<'_>,
    after: &BorderSegment<'_>,
    start: &BorderSegment<'_>,
    end: &BorderSegment<'_>,
) -> f64 {
    let fit = |length: i32, edge: &BorderSegment<'_>, factor: f64| {
        let sum = edge.radius_start() as f64 + edge.radius_end() as f64;
        if sum > length as f64 && sum > 0.0 {
            factor.min(length.max(0) as f64 / sum)
        } else {
            factor
        }
    };
    let mut factor = 1.0;
    factor = fit(width, before, factor);
    factor = fit(width, after, factor);
    factor = fit(height, start, factor);
    fit(height, end, factor)
}

/// Scales a radius by the correction factor, rounding down so corrected
/// radii never add up to more than their edge.
#[inline]
pub fn correct(radius: i32, factor: f64) -> i32 {
    (radius as f64 * factor).floor() as i32
}

/// Where the mitre line of a corner meets its ellipse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct JoinMetrics {
    pub x: f64,
    pub y: f64,
    /// Angle of the ellipse center seen from the join point.
    pub angle: f64,
}

/// Intersects the mitre `y = x·yw/xw` with the ellipse of radii `(a, b)`
/// tangent to both axes, i.e. centered at `(a, b)`.
///
/// `xw` and `yw` are the widths of the two borders meeting at the corner; the
/// mitre runs from the outer corner through the inner corner `(xw, yw)`.
/// The nearer of the two intersections is returned. When the first border
/// has no width the join degenerates to the ellipse point on the y axis.
pub fn join_metrics(a: f64, b: f64, xw: f64, yw: f64) -> JoinMetrics {
    if xw <= 0.0 || a <= 0.0 || b <= 0.0 {
        return JoinMetrics { x: 0.0, y: b, angle: 0.0 };
    }
    let k = yw / xw;
    // (x/a - 1)² + (kx/b - 1)² = 1, smaller root.
    let x = a * b * (b + a * k - (2.0 * a * b * k).sqrt()) / (b * b + a * a * k * k);
    let y = k * x;
    JoinMetrics { x, y, angle: (b - y).atan2(a - x) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::traits::BorderProps;

    fn on_ellipse(a: f64, b: f64, x: f64, y: f64) -> f64 {
        ((x - a) / a).powi(2) + ((y - b) / b).powi(2)
    }

    // ── join metrics ────────────────────────────────────────────────────

    #[test]
    fn join_on_circle_with_equal_widths() {
        let j = join_metrics(100.0, 100.0, 10.0, 10.0);
        // 45° mitre meets the circle at 100·(1 - 1/√2).
        let expected = 100.0 * (1.0 - std::f64::consts::FRAC_1_SQRT_2);
        assert!((j.x - expected).abs() < 1e-9);
        assert!((j.y - expected).abs() < 1e-9);
        assert!((j.angle - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn join_lies_on_mitre_and_ellipse() {
        let (a, b, xw, yw) = (300.0, 120.0, 25.0, 7.0);
        let j = join_metrics(a, b, xw, yw);
        assert!((on_ellipse(a, b, j.x, j.y) - 1.0).abs() < 1e-9);
        assert!((j.y - j.x * yw / xw).abs() < 1e-9);
        assert!(j.x > 0.0 && j.x < a);
        // The angle points from the join back to the center.
        assert!((j.angle - (b - j.y).atan2(a - j.x)).abs() < 1e-12);
    }

    #[test]
    fn join_without_first_border_sits_on_axis() {
        let j = join_metrics(50.0, 80.0, 0.0, 10.0);
        assert_eq!(j, JoinMetrics { x: 0.0, y: 80.0, angle: 0.0 });
    }

    // ── correction factor ───────────────────────────────────────────────

    #[test]
    fn factor_is_one_when_radii_fit() {
        let b = BorderProps::solid(10, Color::black()).with_radii(200, 200);
        let s = BorderSegment::as_is(Some(&b));
        assert_eq!(correction_factor(1000, 1000, &s, &s, &s, &s), 1.0);
    }

    #[test]
    fn factor_takes_the_tightest_edge() {
        let before = BorderProps::solid(10, Color::black()).with_radii(800, 800);
        let start = BorderProps::solid(10, Color::black()).with_radii(100, 300);
        let f = correction_factor(
            1000,
            100,
            &BorderSegment::as_is(Some(&before)),
            &BorderSegment::flipped(None),
            &BorderSegment::flipped(Some(&start)),
            &BorderSegment::as_is(None),
        );
        assert!((f - 0.25).abs() < 1e-12);
    }

    #[test]
    fn corrected_radii_fit_an_odd_edge() {
        let b = BorderProps::solid(1, Color::black()).with_radii(60, 60);
        let s = BorderSegment::as_is(Some(&b));
        let f = correction_factor(37, 5000, &s, &s, &BorderSegment::as_is(None), &BorderSegment::as_is(None));
        assert!((f - 37.0 / 120.0).abs() < 1e-12);
        // 60·f = 18.5 must not round up to 19: 19 + 19 > 37.
        assert_eq!(correct(60, f), 18);
        assert!(2 * correct(60, f) <= 37);
    }

    // ── corners ─────────────────────────────────────────────────────────

    #[test]
    fn corner_points_follow_the_quadrant() {
        let at = Point::new(1000, 0);
        let c = Corner::new(200, 100, CornerAngle::BeforeEnd);
        assert_eq!(c.center(at), Point::new(800, 100));
        assert_eq!(c.entry(at), Point::new(800, 0));
        assert_eq!(c.exit(at), Point::new(1000, 100));
    }

    #[test]
    fn square_corner_stays_on_the_box() {
        let at = Point::new(0, 500);
        let c = Corner::new(200, -5, CornerAngle::AfterStart);
        assert!(!c.is_elliptic());
        assert_eq!(c.entry(at), at);
        assert_eq!(c.exit(at), at);
        assert_eq!(Corner::square(CornerAngle::EndAfter).radius_x, 0);
    }

    #[test]
    fn angles_cover_a_quarter() {
        for a in [
            CornerAngle::StartBefore,
            CornerAngle::BeforeEnd,
            CornerAngle::EndAfter,
            CornerAngle::AfterStart,
        ] {
            assert!((a.end() - a.start() - FRAC_PI_2).abs() < 1e-12);
        }
    }
}
