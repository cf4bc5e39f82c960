//! The graphics-painting protocol.
//!
//! [`GraphicsPainter`] is the minimal set of stateful drawing primitives a
//! backend has to provide so the border engine can render through it. It has
//! no notion of borders as a composite shape.
//!
//! Conventions:
//! - coordinates are integer millipoints in the current coordinate frame
//! - the current frame starts as page space (top-left origin, +Y down) and is
//!   changed by `translate_coordinates` / `rotate_coordinates` /
//!   `scale_coordinates`, which compose onto it
//! - angles are radians and polar: the point at angle θ of an ellipse
//!   centered at `(cx, cy)` is where the ray leaving the center in direction
//!   `(cos θ, sin θ)` crosses the ellipse. With +Y down, positive angles turn
//!   from +X towards +Y. For a circle this is `(cx + r·cos θ, cy + r·sin θ)`;
//!   for `rx != ry` it is not the parametric point

pub mod arc;
pub mod transform;

use std::io;

use crate::coords::Point;
use crate::paint::Color;
use crate::traits::{BorderStyle, RuleStyle};

pub use arc::{arc_segments, arc_to_bezier, BezierCurvePainter};
pub use transform::Transform;

/// Primitive drawing operations implemented by every backend.
///
/// Every primitive may fail with an I/O error when the backend cannot emit the
/// operation. Callers do not recover; the error is propagated.
pub trait GraphicsPainter {
    /// Draws one border line segment inside the box `(x1, y1)`–`(x2, y2)`.
    ///
    /// `horizontal` tells along which axis the line runs. `start_or_before`
    /// is true for the start and before edges and selects the bevel direction
    /// of `inset` / `outset`.
    #[allow(clippy::too_many_arguments)]
    fn draw_border_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        horizontal: bool,
        start_or_before: bool,
        style: BorderStyle,
        color: Color,
    ) -> io::Result<()>;

    /// Draws a rule from `start` to `end` with the given stroke width.
    ///
    /// Only horizontal rules are supported; other lines fail with
    /// [`io::ErrorKind::Unsupported`].
    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        width: i32,
        color: Color,
        style: RuleStyle,
    ) -> io::Result<()>;

    /// Starts a new subpath at `(x, y)`.
    fn move_to(&mut self, x: i32, y: i32) -> io::Result<()>;

    /// Appends a straight segment to `(x, y)`.
    fn line_to(&mut self, x: i32, y: i32) -> io::Result<()>;

    /// Appends an elliptical arc.
    ///
    /// `start_angle` and `end_angle` are polar: the arc runs between the
    /// ellipse points on the rays from `(cx, cy)` at those angles. The current
    /// point must be the point at `start_angle`. The ellipse axes are aligned
    /// with the current coordinate frame.
    fn arc_to(
        &mut self,
        start_angle: f64,
        end_angle: f64,
        cx: i32,
        cy: i32,
        rx: i32,
        ry: i32,
    ) -> io::Result<()>;

    /// Rotates the current coordinate frame by `angle` radians.
    fn rotate_coordinates(&mut self, angle: f64) -> io::Result<()>;

    /// Moves the origin of the current coordinate frame.
    fn translate_coordinates(&mut self, dx: i32, dy: i32) -> io::Result<()>;

    /// Scales the current coordinate frame.
    fn scale_coordinates(&mut self, sx: f32, sy: f32) -> io::Result<()>;

    /// Closes the current subpath.
    fn close_path(&mut self) -> io::Result<()>;

    /// Intersects the clip region with the current path and consumes the path.
    fn clip(&mut self) -> io::Result<()>;

    /// Pushes the full graphics state (frame, clip, current point).
    fn save_graphics_state(&mut self) -> io::Result<()>;

    /// Pops the state pushed by the matching [`save_graphics_state`](Self::save_graphics_state).
    fn restore_graphics_state(&mut self) -> io::Result<()>;
}

/// Runs `body` between a save and a restore of the graphics state.
///
/// The restore is issued even when `body` fails; the first error wins. When
/// the save itself fails nothing was pushed and no restore is issued.
pub fn with_saved_state<G, F>(painter: &mut G, body: F) -> io::Result<()>
where
    G: GraphicsPainter + ?Sized,
    F: FnOnce(&mut G) -> io::Result<()>,
{
    painter.save_graphics_state()?;
    let result = body(painter);
    let restored = painter.restore_graphics_state();
    result.and(restored)
}

/// Error for a rule that is not horizontal.
pub(crate) fn non_horizontal_rule() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "can only draw horizontal rules")
}
