use std::f64::consts::{FRAC_PI_2, PI};
use std::io;

use log::{debug, trace};

use crate::coords::{Point, Rect};
use crate::error::PaintError;
use crate::graphics::{with_saved_state, GraphicsPainter};
use crate::paint::Color;
use crate::traits::BorderProps;

use super::corner::{correct, correction_factor, join_metrics, Corner, CornerAngle, PathCursor};
use super::segment::BorderSegment;

/// Paints border rings and background clips through a [`GraphicsPainter`].
///
/// Each border edge is drawn separately: its outline is built as a closed
/// path (with elliptic arcs at rounded corners and mitred joins to its
/// neighbours), made the clip, and then filled by a single
/// [`GraphicsPainter::draw_border_line`] covering the edge.
pub struct BorderPainter<'a, G: GraphicsPainter + ?Sized> {
    painter: &'a mut G,
}

/// One edge, its two neighbours and the frame it is drawn in.
///
/// In that frame the edge runs from `(0, 0)` to `(length, 0)` with the
/// border lying on the +Y side.
struct EdgeFrame<'s> {
    prev: BorderSegment<'s>,
    this: BorderSegment<'s>,
    next: BorderSegment<'s>,
    /// Quarter turns from the before edge.
    orientation: u8,
    length: i32,
    origin: Point,
}

/// Box handed to `draw_border_line`, in the edge frame.
struct LineBox {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl<'a, G: GraphicsPainter + ?Sized> BorderPainter<'a, G> {
    #[inline]
    pub fn new(painter: &'a mut G) -> Self {
        Self { painter }
    }

    #[inline]
    pub fn painter(&mut self) -> &mut G {
        self.painter
    }

    /// Draws up to four border edges around `rect` (the border rectangle).
    ///
    /// Rectangular borders are drawn as rounded borders with zero radii.
    /// `inner_background` is accepted for backends that paint the background
    /// together with the ring; the vector path leaves it to the caller.
    pub fn draw_borders(
        &mut self,
        rect: Rect,
        before: Option<&BorderProps>,
        after: Option<&BorderProps>,
        start: Option<&BorderProps>,
        end: Option<&BorderProps>,
        inner_background: Option<Color>,
    ) -> Result<(), PaintError> {
        if let Some(bg) = inner_background {
            trace!("inner background {bg} is painted separately");
        }
        rounded_borders(self.painter, rect, before, after, start, end)
            .map_err(|e| PaintError::border("draw_borders", e))
    }

    /// Draws the border edges with straight corners in absolute coordinates,
    /// without changing the coordinate frame.
    ///
    /// Corner radii are ignored. The emitted geometry matches
    /// [`draw_borders`](Self::draw_borders) with all radii zero.
    pub fn draw_rectangular_borders(
        &mut self,
        rect: Rect,
        before: Option<&BorderProps>,
        after: Option<&BorderProps>,
        start: Option<&BorderProps>,
        end: Option<&BorderProps>,
    ) -> Result<(), PaintError> {
        rectangular_borders(self.painter, rect, before, after, start, end)
            .map_err(|e| PaintError::border("draw_rectangular_borders", e))
    }

    /// Clips to the area inside the border ring. `rect` is the padding
    /// rectangle, i.e. the border rectangle minus the border widths.
    ///
    /// The inner corner of a rounded corner is the outer ellipse shrunk by
    /// the two border widths; when that leaves nothing the corner is square.
    pub fn clip_background(
        &mut self,
        rect: Rect,
        before: Option<&BorderProps>,
        after: Option<&BorderProps>,
        start: Option<&BorderProps>,
        end: Option<&BorderProps>,
    ) -> Result<(), PaintError> {
        background_clip(self.painter, rect, before, after, start, end)
            .map_err(|e| PaintError::border("clip_background", e))
    }

    /// Factor applied to every corner radius so that the two radii along any
    /// edge of a `width × height` border box fit within that edge.
    pub fn corner_correction_factor(
        width: i32,
        height: i32,
        before: Option<&BorderProps>,
        after: Option<&BorderProps>,
        start: Option<&BorderProps>,
        end: Option<&BorderProps>,
    ) -> f64 {
        correction_factor(
            width,
            height,
            &BorderSegment::as_is(before),
            &BorderSegment::flipped(after),
            &BorderSegment::flipped(start),
            &BorderSegment::as_is(end),
        )
    }
}

// ── rounded ─────────────────────────────────────────────────────────────────

fn rounded_borders<G: GraphicsPainter + ?Sized>(
    g: &mut G,
    rect: Rect,
    before: Option<&BorderProps>,
    after: Option<&BorderProps>,
    start: Option<&BorderProps>,
    end: Option<&BorderProps>,
) -> io::Result<()> {
    let before = BorderSegment::as_is(before);
    let end = BorderSegment::as_is(end);
    let after = BorderSegment::flipped(after);
    let start = BorderSegment::flipped(start);

    if [before, end, after, start].iter().all(|s| s.width() == 0) {
        return Ok(());
    }

    let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
    let factor = correction_factor(w, h, &before, &after, &start, &end);
    debug!("borders {w}x{h} at ({x}, {y}), corner correction {factor:.4}");

    let edges = [
        EdgeFrame { prev: start, this: before, next: end, orientation: 0, length: w, origin: Point::new(x, y) },
        EdgeFrame { prev: before, this: end, next: after, orientation: 1, length: h, origin: Point::new(x + w, y) },
        EdgeFrame { prev: end, this: after, next: start, orientation: 2, length: w, origin: Point::new(x + w, y + h) },
        EdgeFrame { prev: after, this: start, next: before, orientation: 3, length: h, origin: Point::new(x, y + h) },
    ];
    for edge in &edges {
        draw_border_segment(g, edge, factor)?;
    }
    Ok(())
}

fn draw_border_segment<G: GraphicsPainter + ?Sized>(
    g: &mut G,
    edge: &EdgeFrame<'_>,
    factor: f64,
) -> io::Result<()> {
    let (Some(style), Some(color)) = (edge.this.style(), edge.this.color()) else {
        return Ok(());
    };
    trace!(
        "edge {} width {} length {} style {style}",
        edge.orientation,
        edge.this.width(),
        edge.length
    );

    with_saved_state(g, |g| {
        g.translate_coordinates(edge.origin.x, edge.origin.y)?;
        if edge.orientation != 0 {
            g.rotate_coordinates(edge.orientation as f64 * FRAC_PI_2)?;
        }
        let line = edge_outline(g, edge, factor)?;
        g.close_path()?;
        g.clip()?;
        let start_or_before = edge.orientation == 0 || edge.orientation == 3;
        g.draw_border_line(line.x1, line.y1, line.x2, line.y2, true, start_or_before, style, color)
    })
}

/// Builds the outline of one edge in its own frame: outer start corner,
/// outer end corner, inner end corner, inner start corner.
fn edge_outline<G: GraphicsPainter + ?Sized>(
    g: &mut G,
    edge: &EdgeFrame<'_>,
    factor: f64,
) -> io::Result<LineBox> {
    let EdgeFrame { prev, this, next, length, .. } = edge;

    let sx2 = prev.width() - prev.clipped_width();
    let ex1 = *length;
    let ex2 = ex1 - next.width() + next.clipped_width();
    let outery = -this.clipped_width();
    let innery = this.width() - this.clipped_width();

    // Radii along this edge come from this edge, across it from the neighbour.
    let sb = Corner::new(
        correct(this.radius_start(), factor),
        correct(prev.radius_end(), factor),
        CornerAngle::StartBefore,
    );
    let be = Corner::new(
        correct(this.radius_end(), factor),
        correct(next.radius_start(), factor),
        CornerAngle::BeforeEnd,
    );
    let sb_center = sb.center(Point::zero());
    let be_center = be.center(Point::new(ex1, 0));

    let mut sx1a = 0;
    let mut ex1a = ex1;

    if sb.is_elliptic() {
        let join = join_metrics(sb.radius_x as f64, sb.radius_y as f64, sx2 as f64, innery as f64);
        g.move_to(join.x.round() as i32, join.y.round() as i32)?;
        g.arc_to(PI + join.angle, 1.5 * PI, sb_center.x, sb_center.y, sb.radius_x, sb.radius_y)?;
    } else {
        g.move_to(0, 0)?;
        if this.is_collapse_outer() && !be.is_elliptic() {
            if prev.is_collapse_outer() {
                sx1a -= prev.clipped_width();
            }
            if next.is_collapse_outer() {
                ex1a += next.clipped_width();
            }
            g.line_to(sx1a, outery)?;
            g.line_to(ex1a, outery)?;
        }
    }

    if be.is_elliptic() {
        let join = join_metrics(be.radius_x as f64, be.radius_y as f64, (ex1 - ex2) as f64, innery as f64);
        let outer_angle = FRAC_PI_2 - join.angle;
        g.line_to(be_center.x, 0)?;
        g.arc_to(1.5 * PI, 1.5 * PI + outer_angle, be_center.x, be_center.y, be.radius_x, be.radius_y)?;

        if be_center.x < ex2 && be_center.y > innery {
            let (irx, iry) = (ex2 - be_center.x, be_center.y - innery);
            let join = join_metrics(irx as f64, iry as f64, (ex1 - ex2) as f64, innery as f64);
            g.line_to(ex2 - join.x.round() as i32, innery + join.y.round() as i32)?;
            g.arc_to(2.0 * PI - join.angle, 1.5 * PI, be_center.x, be_center.y, irx, iry)?;
        } else {
            g.line_to(ex2, innery)?;
        }
    } else {
        g.line_to(ex1, 0)?;
        g.line_to(ex2, innery)?;
    }

    if sb.is_elliptic() && sb_center.x > sx2 && sb_center.y > innery {
        let (irx, iry) = (sb_center.x - sx2, sb_center.y - innery);
        let join = join_metrics(irx as f64, iry as f64, sx2 as f64, innery as f64);
        g.line_to(sb_center.x, innery)?;
        g.arc_to(1.5 * PI, PI + join.angle, sb_center.x, sb_center.y, irx, iry)?;
    } else {
        g.line_to(sx2, innery)?;
    }

    let fill_y = if sb.radius_y == 0 && be.radius_y == 0 {
        innery
    } else {
        innery.max(sb.radius_y).max(be.radius_y)
    };
    Ok(LineBox { x1: sx1a, y1: outery, x2: ex1a, y2: fill_y })
}

// ── rectangular ─────────────────────────────────────────────────────────────

/// How far the outer edge of `this` extends past the box corner shared with
/// `neighbour`.
#[inline]
fn outer_extension(this: &BorderSegment<'_>, neighbour: &BorderSegment<'_>) -> i32 {
    if this.is_collapse_outer() && neighbour.is_collapse_outer() {
        neighbour.clipped_width()
    } else {
        0
    }
}

/// Draws one side: `outline` builds the path and returns the line box.
fn rectangular_side<G, F>(
    g: &mut G,
    side: &BorderSegment<'_>,
    horizontal: bool,
    start_or_before: bool,
    outline: F,
) -> io::Result<()>
where
    G: GraphicsPainter + ?Sized,
    F: FnOnce(&mut G) -> io::Result<LineBox>,
{
    let (Some(style), Some(color)) = (side.style(), side.color()) else {
        return Ok(());
    };
    with_saved_state(g, |g| {
        let line = outline(g)?;
        g.close_path()?;
        g.clip()?;
        g.draw_border_line(line.x1, line.y1, line.x2, line.y2, horizontal, start_or_before, style, color)
    })
}

fn rectangular_borders<G: GraphicsPainter + ?Sized>(
    g: &mut G,
    rect: Rect,
    before: Option<&BorderProps>,
    after: Option<&BorderProps>,
    start: Option<&BorderProps>,
    end: Option<&BorderProps>,
) -> io::Result<()> {
    let before = BorderSegment::as_is(before);
    let after = BorderSegment::as_is(after);
    let start = BorderSegment::as_is(start);
    let end = BorderSegment::as_is(end);

    if [before, end, after, start].iter().all(|s| s.width() == 0) {
        return Ok(());
    }

    let (x1, y1) = (rect.x(), rect.y());
    let (x2, y2) = (x1 + rect.width(), y1 + rect.height());
    debug!("rectangular borders {}x{} at ({x1}, {y1})", rect.width(), rect.height());

    rectangular_side(g, &before, true, true, |g| {
        let sx1a = x1 - outer_extension(&before, &start);
        let ex1a = x2 + outer_extension(&before, &end);
        let outery = y1 - before.clipped_width();
        let innery = y1 + before.width() - before.clipped_width();
        g.move_to(x1, y1)?;
        if before.is_collapse_outer() {
            g.line_to(sx1a, outery)?;
            g.line_to(ex1a, outery)?;
        }
        g.line_to(x2, y1)?;
        g.line_to(x2 - end.width() + end.clipped_width(), innery)?;
        g.line_to(x1 + start.width() - start.clipped_width(), innery)?;
        Ok(LineBox { x1: sx1a, y1: outery, x2: ex1a, y2: innery })
    })?;

    rectangular_side(g, &end, false, false, |g| {
        let sy1a = y1 - outer_extension(&end, &before);
        let ey1a = y2 + outer_extension(&end, &after);
        let outerx = x2 + end.clipped_width();
        let innerx = x2 - end.width() + end.clipped_width();
        g.move_to(x2, y1)?;
        if end.is_collapse_outer() {
            g.line_to(outerx, sy1a)?;
            g.line_to(outerx, ey1a)?;
        }
        g.line_to(x2, y2)?;
        g.line_to(innerx, y2 - after.width() + after.clipped_width())?;
        g.line_to(innerx, y1 + before.width() - before.clipped_width())?;
        Ok(LineBox { x1: innerx, y1: sy1a, x2: outerx, y2: ey1a })
    })?;

    rectangular_side(g, &after, true, false, |g| {
        let sx1a = x2 + outer_extension(&after, &end);
        let ex1a = x1 - outer_extension(&after, &start);
        let outery = y2 + after.clipped_width();
        let innery = y2 - after.width() + after.clipped_width();
        g.move_to(x2, y2)?;
        if after.is_collapse_outer() {
            g.line_to(sx1a, outery)?;
            g.line_to(ex1a, outery)?;
        }
        g.line_to(x1, y2)?;
        g.line_to(x1 + start.width() - start.clipped_width(), innery)?;
        g.line_to(x2 - end.width() + end.clipped_width(), innery)?;
        Ok(LineBox { x1: ex1a, y1: innery, x2: sx1a, y2: outery })
    })?;

    rectangular_side(g, &start, false, true, |g| {
        let sy1a = y2 + outer_extension(&start, &after);
        let ey1a = y1 - outer_extension(&start, &before);
        let outerx = x1 - start.clipped_width();
        let innerx = x1 + start.width() - start.clipped_width();
        g.move_to(x1, y2)?;
        if start.is_collapse_outer() {
            g.line_to(outerx, sy1a)?;
            g.line_to(outerx, ey1a)?;
        }
        g.line_to(x1, y1)?;
        g.line_to(innerx, y1 + before.width() - before.clipped_width())?;
        g.line_to(innerx, y2 - after.width() + after.clipped_width())?;
        Ok(LineBox { x1: outerx, y1: ey1a, x2: innerx, y2: sy1a })
    })
}

// ── background clip ─────────────────────────────────────────────────────────

fn background_clip<G: GraphicsPainter + ?Sized>(
    g: &mut G,
    rect: Rect,
    before: Option<&BorderProps>,
    after: Option<&BorderProps>,
    start: Option<&BorderProps>,
    end: Option<&BorderProps>,
) -> io::Result<()> {
    let before = BorderSegment::as_is(before);
    let end = BorderSegment::as_is(end);
    let after = BorderSegment::flipped(after);
    let start = BorderSegment::flipped(start);

    let factor = correction_factor(
        rect.width() + start.width() + end.width(),
        rect.height() + before.width() + after.width(),
        &before,
        &after,
        &start,
        &end,
    );

    // Inner radii of the corner between `prev` and `next` (walking
    // clockwise): along `prev`, then along `next`.
    let inner = |prev: &BorderSegment<'_>, next: &BorderSegment<'_>| {
        (
            correct(prev.radius_end(), factor) - next.width(),
            correct(next.radius_start(), factor) - prev.width(),
        )
    };
    let (be_along, be_across) = inner(&before, &end);
    let (ea_along, ea_across) = inner(&end, &after);
    let (as_along, as_across) = inner(&after, &start);
    let (sb_along, sb_across) = inner(&start, &before);

    let be = Corner::new(be_along, be_across, CornerAngle::BeforeEnd);
    let ea = Corner::new(ea_across, ea_along, CornerAngle::EndAfter);
    let as_ = Corner::new(as_along, as_across, CornerAngle::AfterStart);
    let sb = Corner::new(sb_across, sb_along, CornerAngle::StartBefore);

    let (x1, y1) = (rect.x(), rect.y());
    let (x2, y2) = (x1 + rect.width(), y1 + rect.height());
    trace!("background clip {}x{} at ({x1}, {y1})", rect.width(), rect.height());

    PathCursor::move_to(g, sb.exit(Point::new(x1, y1)))?
        .corner(g, &be, Point::new(x2, y1))?
        .corner(g, &ea, Point::new(x2, y2))?
        .corner(g, &as_, Point::new(x1, y2))?
        .corner(g, &sb, Point::new(x1, y1))?;
    g.close_path()?;
    g.clip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{DeviceOp, Op, OpKind, RecordingPainter};
    use crate::graphics::Transform;
    use crate::traits::{BorderMode, BorderStyle};
    use std::collections::HashSet;

    fn solid(width: i32) -> BorderProps {
        BorderProps::solid(width, Color::black())
    }

    fn draw(
        rect: Rect,
        before: Option<&BorderProps>,
        after: Option<&BorderProps>,
        start: Option<&BorderProps>,
        end: Option<&BorderProps>,
    ) -> RecordingPainter {
        let mut rec = RecordingPainter::new();
        BorderPainter::new(&mut rec)
            .draw_borders(rect, before, after, start, end, None)
            .unwrap();
        rec
    }

    fn arc_centers(rec: &RecordingPainter) -> HashSet<Point> {
        rec.device_ops()
            .into_iter()
            .filter_map(|op| match op {
                DeviceOp::ArcTo { center, .. } => Some(center),
                _ => None,
            })
            .collect()
    }

    // ── scenarios ───────────────────────────────────────────────────────

    #[test]
    fn square_ring_draws_four_lines_and_no_arcs() {
        let b = solid(10);
        let rec = draw(Rect::new(0, 0, 1000, 1000), Some(&b), Some(&b), Some(&b), Some(&b));
        assert_eq!(rec.count(OpKind::BorderLine), 4);
        assert_eq!(rec.count(OpKind::ArcTo), 0);
        assert_eq!(rec.count(OpKind::Clip), 4);
        assert_eq!(
            rec.ops().iter().find(|op| op.kind() == OpKind::BorderLine),
            Some(&Op::BorderLine {
                x1: 0,
                y1: 0,
                x2: 1000,
                y2: 10,
                horizontal: true,
                start_or_before: true,
                style: BorderStyle::Solid,
                color: Color::black(),
            })
        );
    }

    #[test]
    fn rounded_ring_arcs_sit_on_four_corner_ellipses() {
        let b = solid(10).with_radii(200, 200);
        let borders = (Some(&b), Some(&b), Some(&b), Some(&b));
        let factor = BorderPainter::<RecordingPainter>::corner_correction_factor(
            1000, 1000, borders.0, borders.1, borders.2, borders.3,
        );
        assert_eq!(factor, 1.0);

        let rec = draw(Rect::new(0, 0, 1000, 1000), borders.0, borders.1, borders.2, borders.3);
        let expected: HashSet<Point> = [(200, 200), (800, 200), (800, 800), (200, 800)]
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect();
        assert_eq!(arc_centers(&rec), expected);
        assert_eq!(rec.count(OpKind::BorderLine), 4);

        // Outer arcs keep the full radius, inner arcs are shrunk by the widths.
        let radii: HashSet<(i32, i32)> = rec
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::ArcTo { rx, ry, .. } => Some((*rx, *ry)),
                _ => None,
            })
            .collect();
        assert_eq!(radii, HashSet::from([(200, 200), (190, 190)]));
    }

    #[test]
    fn rounded_background_clip_has_one_arc_per_corner() {
        let b = solid(10).with_radii(200, 200);
        let mut rec = RecordingPainter::new();
        BorderPainter::new(&mut rec)
            .clip_background(Rect::new(10, 10, 980, 980), Some(&b), Some(&b), Some(&b), Some(&b))
            .unwrap();
        assert_eq!(rec.count(OpKind::ArcTo), 4);
        assert_eq!(rec.count(OpKind::Clip), 1);
        assert_eq!(rec.ops()[0], Op::MoveTo { x: 200, y: 10 });
        assert_eq!(rec.ops()[1], Op::LineTo { x: 800, y: 10 });
        assert_eq!(
            rec.ops()[2],
            Op::ArcTo {
                start_angle: CornerAngle::BeforeEnd.start(),
                end_angle: CornerAngle::BeforeEnd.end(),
                cx: 800,
                cy: 200,
                rx: 190,
                ry: 190,
            }
        );
    }

    #[test]
    fn oversized_radius_scales_every_corner() {
        let before = solid(10).with_radii(800, 800);
        let end = solid(10).with_radii(80, 0);
        let side = solid(10);
        let factor = BorderPainter::<RecordingPainter>::corner_correction_factor(
            1000,
            100,
            Some(&before),
            Some(&side),
            Some(&side),
            Some(&end),
        );
        assert!((factor - 0.625).abs() < 1e-12);

        let rec = draw(Rect::new(0, 0, 1000, 100), Some(&before), Some(&side), Some(&side), Some(&end));
        let radii: Vec<(i32, i32)> = rec
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::ArcTo { rx, ry, .. } => Some((*rx, *ry)),
                _ => None,
            })
            .collect();
        // Before edge at the before-end corner, then the end edge at the same
        // corner seen from its own frame.
        assert!(radii.contains(&(500, 50)));
        assert!(radii.contains(&(50, 500)));
        assert!(radii.iter().all(|&(rx, ry)| rx <= 500 && ry <= 500));
    }

    #[test]
    fn absent_edge_squares_its_corners() {
        let b = solid(10).with_radii(100, 100);
        let rec = draw(Rect::new(0, 0, 1000, 1000), None, Some(&b), Some(&b), Some(&b));
        let centers = arc_centers(&rec);
        assert_eq!(centers, HashSet::from([Point::new(900, 900), Point::new(100, 900)]));
        assert_eq!(rec.count(OpKind::BorderLine), 3);
    }

    // ── invariants ──────────────────────────────────────────────────────

    #[test]
    fn zero_width_edge_matches_absent_edge() {
        let zero = solid(0).with_radii(300, 300);
        let b = solid(20).with_radii(150, 50);
        let rect = Rect::new(100, 200, 2000, 1000);
        let with_zero = draw(rect, Some(&zero), Some(&b), Some(&b), Some(&b));
        let with_none = draw(rect, None, Some(&b), Some(&b), Some(&b));
        assert_eq!(with_zero.ops(), with_none.ops());
    }

    #[test]
    fn nothing_is_drawn_without_widths() {
        let zero = solid(0);
        let rec = draw(Rect::new(0, 0, 100, 100), Some(&zero), None, Some(&zero), None);
        assert!(rec.ops().is_empty());
    }

    #[test]
    fn zero_radii_match_the_rectangular_algorithm() {
        let outer = |w| solid(w).with_mode(BorderMode::CollapseOuter);
        let inner = |w| solid(w).with_mode(BorderMode::CollapseInner);
        let cases: Vec<[Option<BorderProps>; 4]> = vec![
            [Some(solid(10)), Some(solid(10)), Some(solid(10)), Some(solid(10))],
            [Some(solid(40)), None, Some(solid(5)), Some(solid(120))],
            [Some(outer(20)), Some(outer(30)), Some(outer(10)), Some(outer(40))],
            [Some(outer(20)), Some(inner(30)), None, Some(outer(40))],
            [None, None, Some(inner(14)), None],
        ];
        let rect = Rect::new(5000, 7000, 30000, 12000);
        for [before, after, start, end] in &cases {
            let rounded = draw(rect, before.as_ref(), after.as_ref(), start.as_ref(), end.as_ref());
            let mut rectangular = RecordingPainter::new();
            BorderPainter::new(&mut rectangular)
                .draw_rectangular_borders(rect, before.as_ref(), after.as_ref(), start.as_ref(), end.as_ref())
                .unwrap();
            assert_eq!(rounded.device_ops(), rectangular.device_ops(), "case {before:?} {after:?} {start:?} {end:?}");
            assert_eq!(rectangular.count(OpKind::Translate), 0);
        }
    }

    #[test]
    fn collapse_outer_extends_the_outer_edge() {
        let b = solid(20).with_mode(BorderMode::CollapseOuter);
        let rec = draw(Rect::new(0, 0, 1000, 500), Some(&b), Some(&b), Some(&b), Some(&b));
        assert_eq!(
            &rec.ops()[..6],
            &[
                Op::Save,
                Op::Translate { dx: 0, dy: 0 },
                Op::MoveTo { x: 0, y: 0 },
                Op::LineTo { x: -10, y: -10 },
                Op::LineTo { x: 1010, y: -10 },
                Op::LineTo { x: 1000, y: 0 },
            ]
        );
    }

    #[test]
    fn corrected_radii_never_overlap() {
        let sizes = [(1000, 1000), (1000, 100), (37, 5000), (10, 10)];
        let radii = [0, 3, 60, 499, 500, 501, 800, 4999, 10000];
        for &(w, h) in &sizes {
            for &r1 in &radii {
                for &r2 in &radii {
                    let before = solid(5).with_radii(r1, r2);
                    let start = solid(5).with_radii(r2, r1);
                    let f = BorderPainter::<RecordingPainter>::corner_correction_factor(
                        w,
                        h,
                        Some(&before),
                        Some(&before),
                        Some(&start),
                        Some(&start),
                    );
                    assert!(f <= 1.0);
                    assert!(correct(r1, f) + correct(r2, f) <= w, "{w}x{h} {r1}/{r2}");
                    assert!(correct(r2, f) + correct(r1, f) <= h, "{w}x{h} {r1}/{r2}");
                }
            }
        }
    }

    #[test]
    fn fitting_radii_are_used_unchanged() {
        let b = solid(10).with_radii(120, 340);
        let rec = draw(Rect::new(0, 0, 1000, 1000), Some(&b), Some(&b), Some(&b), Some(&b));
        assert!(rec.ops().iter().any(|op| matches!(op, Op::ArcTo { rx: 120, ry: 340, .. })));
        assert!(rec.ops().iter().any(|op| matches!(op, Op::ArcTo { rx: 340, ry: 120, .. })));
    }

    #[test]
    fn state_is_balanced_after_drawing() {
        let b = solid(15).with_radii(90, 60);
        let rec = draw(Rect::new(0, 0, 600, 400), Some(&b), Some(&b), Some(&b), Some(&b));
        assert_eq!(rec.count(OpKind::Save), 4);
        assert_eq!(rec.count(OpKind::Restore), 4);
        assert_eq!(rec.depth(), 0);
        assert!(rec.transform().is_identity(0.0));
    }

    // ── failures ────────────────────────────────────────────────────────

    #[test]
    fn every_failure_point_leaves_state_balanced() {
        let b = solid(15).with_radii(90, 60).with_mode(BorderMode::CollapseOuter);
        let rect = Rect::new(0, 0, 600, 400);
        let total = draw(rect, Some(&b), Some(&b), Some(&b), Some(&b)).drawing_calls();
        assert!(total > 0);

        for n in 0..total {
            let mut rec = RecordingPainter::failing_at(n);
            let err = BorderPainter::new(&mut rec)
                .draw_borders(rect, Some(&b), Some(&b), Some(&b), Some(&b), None)
                .unwrap_err();
            assert!(matches!(err, PaintError::Border { operation: "draw_borders", .. }));
            assert_eq!(rec.count(OpKind::Save), rec.count(OpKind::Restore), "failure at {n}");
            assert_eq!(rec.depth(), 0);
            assert!(rec.transform().approx_eq(&Transform::identity(), 0.0));
        }
    }

    #[test]
    fn failure_is_reported_with_the_operation() {
        let b = solid(10);
        let mut rec = RecordingPainter::failing_at(0);
        let err = BorderPainter::new(&mut rec)
            .clip_background(Rect::new(0, 0, 10, 10), Some(&b), None, None, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "I/O error in clip_background(): injected failure");
    }

    #[test]
    fn thick_borders_square_the_background_clip() {
        let b = solid(300).with_radii(200, 200);
        let mut rec = RecordingPainter::new();
        BorderPainter::new(&mut rec)
            .clip_background(Rect::new(300, 300, 400, 400), Some(&b), Some(&b), Some(&b), Some(&b))
            .unwrap();
        assert_eq!(rec.count(OpKind::ArcTo), 0);
        assert_eq!(
            rec.ops(),
            &[
                Op::MoveTo { x: 300, y: 300 },
                Op::LineTo { x: 700, y: 300 },
                Op::LineTo { x: 700, y: 700 },
                Op::LineTo { x: 300, y: 700 },
                Op::LineTo { x: 300, y: 300 },
                Op::ClosePath,
                Op::Clip,
            ]
        );
    }

    // ── arc continuity ──────────────────────────────────────────────────

    /// Point of the ellipse on the ray leaving the center at `angle`.
    fn on_ray(angle: f64, cx: i32, cy: i32, rx: i32, ry: i32) -> (f64, f64) {
        let (rx, ry) = (rx as f64, ry as f64);
        let r = rx * ry / ((ry * angle.cos()).powi(2) + (rx * angle.sin()).powi(2)).sqrt();
        (cx as f64 + r * angle.cos(), cy as f64 + r * angle.sin())
    }

    /// Largest distance between the current point and the start of the next
    /// arc, over every arc in `ops`.
    fn worst_arc_gap(ops: &[Op]) -> f64 {
        let mut current = (0.0, 0.0);
        let mut worst: f64 = 0.0;
        for op in ops {
            match *op {
                Op::MoveTo { x, y } | Op::LineTo { x, y } => current = (x as f64, y as f64),
                Op::ArcTo { start_angle, end_angle, cx, cy, rx, ry } => {
                    let (sx, sy) = on_ray(start_angle, cx, cy, rx, ry);
                    worst = worst.max((sx - current.0).hypot(sy - current.1));
                    current = on_ray(end_angle, cx, cy, rx, ry);
                }
                _ => {}
            }
        }
        worst
    }

    #[test]
    fn arcs_start_at_the_current_point() {
        let widths = [(10, 10), (5, 40), (40, 5), (100, 7)];
        let radii = [(200, 200), (300, 80), (50, 400)];
        let modes = [BorderMode::Separate, BorderMode::CollapseOuter];
        for &(wh, wv) in &widths {
            for &(r1, r2) in &radii {
                for mode in modes {
                    let horizontal = solid(wh).with_radii(r1, r2).with_mode(mode);
                    let vertical = solid(wv).with_radii(r2, r1).with_mode(mode);
                    let edges = (Some(&horizontal), Some(&horizontal), Some(&vertical), Some(&vertical));
                    let rect = Rect::new(0, 0, 1000, 1000);

                    let rec = draw(rect, edges.0, edges.1, edges.2, edges.3);
                    assert!(rec.count(OpKind::ArcTo) > 0);
                    let gap = worst_arc_gap(rec.ops());
                    assert!(gap < 1.5, "borders {wh}/{wv} radii {r1}/{r2} {mode:?}: gap {gap}");

                    let mut rec = RecordingPainter::new();
                    BorderPainter::new(&mut rec)
                        .clip_background(rect, edges.0, edges.1, edges.2, edges.3)
                        .unwrap();
                    let gap = worst_arc_gap(rec.ops());
                    assert!(gap < 1.5, "clip {wh}/{wv} radii {r1}/{r2} {mode:?}: gap {gap}");
                }
            }
        }
    }
}
