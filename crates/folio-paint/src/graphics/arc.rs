//! Elliptical arc to cubic Bézier conversion.
//!
//! Backends whose path model only knows cubic curves (PDF, PostScript) turn
//! `arc_to` into one curve per quarter turn or less. Control points follow
//! L. Maisonobe, "Drawing an elliptical arc using polylines, quadratic or
//! cubic Bézier curves" (2003).

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::io;

use crate::coords::Point;

/// Sink for the cubic segments produced by [`arc_to_bezier`].
pub trait BezierCurvePainter {
    /// Appends a cubic curve from the current point to `p3`.
    fn cubic_bezier_to(&mut self, p1: Point, p2: Point, p3: Point) -> io::Result<()>;
}

/// Converts the arc `start_angle → end_angle` of the ellipse centered at
/// `(cx, cy)` into cubic curves and feeds them to `painter`.
///
/// The current point of `painter` is expected to already be the ellipse point
/// at `start_angle`.
pub fn arc_to_bezier<P>(
    painter: &mut P,
    start_angle: f64,
    end_angle: f64,
    cx: i32,
    cy: i32,
    rx: i32,
    ry: i32,
) -> io::Result<()>
where
    P: BezierCurvePainter + ?Sized,
{
    for [p1, p2, p3] in arc_segments(start_angle, end_angle, cx, cy, rx, ry) {
        painter.cubic_bezier_to(p1, p2, p3)?;
    }
    Ok(())
}

/// Control points (`p1`, `p2`, `p3`) of the cubic curves approximating an
/// elliptical arc. Each curve spans at most a quarter turn.
///
/// A degenerate ellipse (a zero radius) yields a single straight curve to the
/// end point. A zero sweep yields nothing.
pub fn arc_segments(
    start_angle: f64,
    end_angle: f64,
    cx: i32,
    cy: i32,
    rx: i32,
    ry: i32,
) -> Vec<[Point; 3]> {
    let sweep = end_angle - start_angle;
    if sweep == 0.0 {
        return Vec::new();
    }

    let (rx, ry) = (rx as f64, ry as f64);
    let (cx, cy) = (cx as f64, cy as f64);
    let at = |eta: f64| (cx + rx * eta.cos(), cy + ry * eta.sin());

    if rx == 0.0 || ry == 0.0 {
        let (x, y) = at(end_angle);
        let end = round(x, y);
        return vec![[end, end, end]];
    }

    // Polar angles to parametric angles, keeping the sweep direction and its
    // number of turns.
    let eta_start = parametric(start_angle, rx, ry);
    let mut eta_sweep = parametric(end_angle, rx, ry) - eta_start;
    while sweep - eta_sweep > PI {
        eta_sweep += TAU;
    }
    while eta_sweep - sweep > PI {
        eta_sweep -= TAU;
    }

    let count = ((eta_sweep.abs() / FRAC_PI_2) - 1e-9).ceil().max(1.0) as usize;
    let step = eta_sweep / count as f64;
    let t = (step / 2.0).tan();
    let alpha = step.sin() * ((4.0 + 3.0 * t * t).sqrt() - 1.0) / 3.0;

    let mut segments = Vec::with_capacity(count);
    let mut eta0 = eta_start;
    for i in 0..count {
        let eta1 = if i + 1 == count { eta_start + eta_sweep } else { eta0 + step };
        let (x0, y0) = at(eta0);
        let (x3, y3) = at(eta1);
        let (dx0, dy0) = (-rx * eta0.sin(), ry * eta0.cos());
        let (dx1, dy1) = (-rx * eta1.sin(), ry * eta1.cos());
        segments.push([
            round(x0 + alpha * dx0, y0 + alpha * dy0),
            round(x3 - alpha * dx1, y3 - alpha * dy1),
            round(x3, y3),
        ]);
        eta0 = eta1;
    }
    segments
}

#[inline]
fn parametric(angle: f64, rx: f64, ry: f64) -> f64 {
    (rx * angle.sin()).atan2(ry * angle.cos())
}

#[inline]
fn round(x: f64, y: f64) -> Point {
    Point::new(x.round() as i32, y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    struct Collect(Vec<[Point; 3]>);

    impl BezierCurvePainter for Collect {
        fn cubic_bezier_to(&mut self, p1: Point, p2: Point, p3: Point) -> io::Result<()> {
            self.0.push([p1, p2, p3]);
            Ok(())
        }
    }

    #[test]
    fn quarter_circle_is_one_curve() {
        let segs = arc_segments(0.0, FRAC_PI_2, 0, 0, 1000, 1000);
        assert_eq!(
            segs,
            vec![[Point::new(1000, 549), Point::new(549, 1000), Point::new(0, 1000)]]
        );
    }

    #[test]
    fn elliptic_quadrant_ends_on_axes() {
        let segs = arc_segments(PI, 1.5 * PI, 3000, 2000, 2000, 1000);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0][2], Point::new(3000, 1000));
        // First control point leaves (1000, 2000) straight up.
        assert_eq!(segs[0][0].x, 1000);
        assert!(segs[0][0].y < 2000);
    }

    #[test]
    fn full_turn_splits_into_four() {
        let segs = arc_segments(0.0, TAU, 0, 0, 500, 500);
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[3][2], Point::new(500, 0));
    }

    #[test]
    fn reverse_sweep_runs_backwards() {
        let segs = arc_segments(1.5 * PI + 0.3, 1.5 * PI, 0, 0, 1000, 2000);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0][2], Point::new(0, -2000));
        // Moving towards -X when ending at the top of the ellipse.
        assert!(segs[0][0].x > segs[0][1].x);
    }

    #[test]
    fn polar_end_point_is_preserved_on_ellipse() {
        // The end point lies on the ray at the requested polar angle.
        let theta = PI + 0.7;
        let segs = arc_segments(PI, theta, 0, 0, 3000, 1000);
        let end = segs.last().unwrap()[2];
        let polar = (end.y as f64).atan2(end.x as f64) + TAU;
        assert!((polar - theta).abs() < 2e-3, "polar {polar} vs {theta}");
    }

    #[test]
    fn degenerate_radius_draws_straight() {
        let segs = arc_segments(0.0, FRAC_PI_2, 100, 100, 0, 400);
        assert_eq!(segs, vec![[Point::new(100, 500); 3]]);
    }

    #[test]
    fn zero_sweep_is_empty() {
        let mut sink = Collect(Vec::new());
        arc_to_bezier(&mut sink, 1.0, 1.0, 0, 0, 10, 10).unwrap();
        assert!(sink.0.is_empty());
    }

    #[test]
    fn forwards_all_segments() {
        let mut sink = Collect(Vec::new());
        arc_to_bezier(&mut sink, 0.0, PI, 0, 0, 10, 10).unwrap();
        assert_eq!(sink.0.len(), 2);
        assert_eq!(sink.0[1][2], Point::new(-10, 0));
    }
}
