//! A [`GraphicsPainter`] that records every call.
//!
//! Besides the raw call log the recorder tracks the coordinate frame and the
//! save/restore stack, so callers can check state balance and compare output
//! in device space regardless of how it was produced.

use std::io;

use serde::Serialize;

use crate::coords::{Point, Rect};
use crate::graphics::{non_horizontal_rule, GraphicsPainter, Transform};
use crate::paint::Color;
use crate::traits::{BorderStyle, RuleStyle};

/// One recorded call, in the coordinates it was issued in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Op {
    MoveTo { x: i32, y: i32 },
    LineTo { x: i32, y: i32 },
    ArcTo { start_angle: f64, end_angle: f64, cx: i32, cy: i32, rx: i32, ry: i32 },
    Rotate { angle: f64 },
    Translate { dx: i32, dy: i32 },
    Scale { sx: f32, sy: f32 },
    ClosePath,
    Clip,
    Save,
    Restore,
    BorderLine {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        horizontal: bool,
        start_or_before: bool,
        style: BorderStyle,
        color: Color,
    },
    Line { start: Point, end: Point, width: i32, color: Color, style: RuleStyle },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OpKind {
    MoveTo,
    LineTo,
    ArcTo,
    Rotate,
    Translate,
    Scale,
    ClosePath,
    Clip,
    Save,
    Restore,
    BorderLine,
    Line,
}

impl Op {
    pub fn kind(&self) -> OpKind {
        match self {
            Op::MoveTo { .. } => OpKind::MoveTo,
            Op::LineTo { .. } => OpKind::LineTo,
            Op::ArcTo { .. } => OpKind::ArcTo,
            Op::Rotate { .. } => OpKind::Rotate,
            Op::Translate { .. } => OpKind::Translate,
            Op::Scale { .. } => OpKind::Scale,
            Op::ClosePath => OpKind::ClosePath,
            Op::Clip => OpKind::Clip,
            Op::Save => OpKind::Save,
            Op::Restore => OpKind::Restore,
            Op::BorderLine { .. } => OpKind::BorderLine,
            Op::Line { .. } => OpKind::Line,
        }
    }
}

/// A recorded call mapped into page space. Frame changes and state
/// save/restore have no device-space counterpart and are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum DeviceOp {
    MoveTo { at: Point },
    LineTo { at: Point },
    ArcTo { center: Point, rx: i32, ry: i32, start_angle: f64, end_angle: f64 },
    ClosePath,
    Clip,
    BorderLine {
        rect: Rect,
        horizontal: bool,
        start_or_before: bool,
        style: BorderStyle,
        color: Color,
    },
    Line { start: Point, end: Point, width: i32, color: Color, style: RuleStyle },
}

#[derive(Debug, Default)]
pub struct RecordingPainter {
    ops: Vec<Op>,
    /// Frame in effect when each op was issued.
    frames: Vec<Transform>,
    current: Transform,
    stack: Vec<Transform>,
    /// Index of the drawing call that fails; save/restore never fail.
    fail_at: Option<usize>,
    drawing_calls: usize,
}

impl RecordingPainter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose `index`-th drawing call (counting every call except
    /// save and restore, from zero) fails with an I/O error.
    pub fn failing_at(index: usize) -> Self {
        Self { fail_at: Some(index), ..Self::default() }
    }

    #[inline]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    #[inline]
    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    /// Forgets the recorded calls; frame and stack are kept.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.frames.clear();
    }

    pub fn count(&self, kind: OpKind) -> usize {
        self.ops.iter().filter(|op| op.kind() == kind).count()
    }

    /// Drawing calls attempted so far, including a failed one.
    #[inline]
    pub fn drawing_calls(&self) -> usize {
        self.drawing_calls
    }

    /// Number of saved states not yet restored.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.current
    }

    pub fn device_ops(&self) -> Vec<DeviceOp> {
        self.ops
            .iter()
            .zip(&self.frames)
            .filter_map(|(op, frame)| project(op, frame))
            .collect()
    }

    fn record(&mut self, op: Op) -> io::Result<()> {
        let kind = op.kind();
        if !matches!(kind, OpKind::Save | OpKind::Restore) {
            let index = self.drawing_calls;
            self.drawing_calls += 1;
            if self.fail_at == Some(index) {
                return Err(io::Error::other("injected failure"));
            }
        }

        let frame = self.current;
        match &op {
            Op::Translate { dx, dy } => {
                self.current = self.current.pre_concat(&Transform::translation(*dx as f64, *dy as f64));
            }
            Op::Rotate { angle } => {
                self.current = self.current.pre_concat(&Transform::rotation(*angle));
            }
            Op::Scale { sx, sy } => {
                self.current = self.current.pre_concat(&Transform::scaling(*sx as f64, *sy as f64));
            }
            Op::Save => self.stack.push(self.current),
            Op::Restore => {
                self.current = self
                    .stack
                    .pop()
                    .ok_or_else(|| io::Error::other("restore without matching save"))?;
            }
            _ => {}
        }
        self.ops.push(op);
        self.frames.push(frame);
        Ok(())
    }
}

/// Quarter turns swap the axes of an ellipse and of a border line.
fn swaps_axes(frame: &Transform) -> bool {
    let (vx, vy) = frame.apply_vector(1.0, 0.0);
    vy.abs() > vx.abs()
}

fn project(op: &Op, frame: &Transform) -> Option<DeviceOp> {
    let map = |x: i32, y: i32| frame.apply_point(Point::new(x, y));
    let length = |x: f64, y: f64| {
        let (vx, vy) = frame.apply_vector(x, y);
        vx.hypot(vy).round() as i32
    };

    Some(match *op {
        Op::MoveTo { x, y } => DeviceOp::MoveTo { at: map(x, y) },
        Op::LineTo { x, y } => DeviceOp::LineTo { at: map(x, y) },
        Op::ArcTo { start_angle, end_angle, cx, cy, rx, ry } => {
            let turn = frame.b.atan2(frame.a);
            let (lx, ly) = (length(rx as f64, 0.0), length(0.0, ry as f64));
            let (rx, ry) = if swaps_axes(frame) { (ly, lx) } else { (lx, ly) };
            DeviceOp::ArcTo {
                center: map(cx, cy),
                rx,
                ry,
                start_angle: start_angle + turn,
                end_angle: end_angle + turn,
            }
        }
        Op::ClosePath => DeviceOp::ClosePath,
        Op::Clip => DeviceOp::Clip,
        Op::BorderLine { x1, y1, x2, y2, horizontal, start_or_before, style, color } => {
            DeviceOp::BorderLine {
                rect: Rect::from_corners(map(x1, y1), map(x2, y2)),
                horizontal: horizontal != swaps_axes(frame),
                start_or_before,
                style,
                color,
            }
        }
        Op::Line { start, end, width, color, style } => DeviceOp::Line {
            start: frame.apply_point(start),
            end: frame.apply_point(end),
            width,
            color,
            style,
        },
        Op::Rotate { .. } | Op::Translate { .. } | Op::Scale { .. } | Op::Save | Op::Restore => {
            return None;
        }
    })
}

impl GraphicsPainter for RecordingPainter {
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
    ) -> io::Result<()> {
        self.record(Op::BorderLine { x1, y1, x2, y2, horizontal, start_or_before, style, color })
    }

    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        width: i32,
        color: Color,
        style: RuleStyle,
    ) -> io::Result<()> {
        if start.y != end.y {
            return Err(non_horizontal_rule());
        }
        self.record(Op::Line { start, end, width, color, style })
    }

    fn move_to(&mut self, x: i32, y: i32) -> io::Result<()> {
        self.record(Op::MoveTo { x, y })
    }

    fn line_to(&mut self, x: i32, y: i32) -> io::Result<()> {
        self.record(Op::LineTo { x, y })
    }

    fn arc_to(
        &mut self,
        start_angle: f64,
        end_angle: f64,
        cx: i32,
        cy: i32,
        rx: i32,
        ry: i32,
    ) -> io::Result<()> {
        self.record(Op::ArcTo { start_angle, end_angle, cx, cy, rx, ry })
    }

    fn rotate_coordinates(&mut self, angle: f64) -> io::Result<()> {
        self.record(Op::Rotate { angle })
    }

    fn translate_coordinates(&mut self, dx: i32, dy: i32) -> io::Result<()> {
        self.record(Op::Translate { dx, dy })
    }

    fn scale_coordinates(&mut self, sx: f32, sy: f32) -> io::Result<()> {
        self.record(Op::Scale { sx, sy })
    }

    fn close_path(&mut self) -> io::Result<()> {
        self.record(Op::ClosePath)
    }

    fn clip(&mut self) -> io::Result<()> {
        self.record(Op::Clip)
    }

    fn save_graphics_state(&mut self) -> io::Result<()> {
        self.record(Op::Save)
    }

    fn restore_graphics_state(&mut self) -> io::Result<()> {
        self.record(Op::Restore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::with_saved_state;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn tracks_frames_through_save_and_restore() {
        let mut rec = RecordingPainter::new();
        rec.save_graphics_state().unwrap();
        rec.translate_coordinates(100, 50).unwrap();
        rec.rotate_coordinates(FRAC_PI_2).unwrap();
        rec.move_to(10, 0).unwrap();
        assert_eq!(rec.depth(), 1);
        rec.restore_graphics_state().unwrap();
        assert_eq!(rec.depth(), 0);
        assert!(rec.transform().is_identity(0.0));
        assert_eq!(rec.device_ops(), vec![DeviceOp::MoveTo { at: Point::new(100, 60) }]);
    }

    #[test]
    fn unmatched_restore_fails() {
        let mut rec = RecordingPainter::new();
        assert!(rec.restore_graphics_state().is_err());
        assert!(rec.ops().is_empty());
    }

    #[test]
    fn rotated_border_line_becomes_vertical() {
        let mut rec = RecordingPainter::new();
        rec.translate_coordinates(1000, 0).unwrap();
        rec.rotate_coordinates(FRAC_PI_2).unwrap();
        rec.draw_border_line(0, 0, 500, 10, true, false, BorderStyle::Solid, Color::black())
            .unwrap();
        assert_eq!(
            rec.device_ops(),
            vec![DeviceOp::BorderLine {
                rect: Rect::new(990, 0, 10, 500),
                horizontal: false,
                start_or_before: false,
                style: BorderStyle::Solid,
                color: Color::black(),
            }]
        );
    }

    #[test]
    fn rotated_arc_swaps_radii() {
        let mut rec = RecordingPainter::new();
        rec.rotate_coordinates(FRAC_PI_2).unwrap();
        rec.arc_to(0.0, FRAC_PI_2, 100, 0, 30, 70).unwrap();
        match &rec.device_ops()[0] {
            DeviceOp::ArcTo { center, rx, ry, start_angle, .. } => {
                assert_eq!(*center, Point::new(0, 100));
                assert_eq!((*rx, *ry), (70, 30));
                assert!((start_angle - FRAC_PI_2).abs() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn injected_failure_hits_one_drawing_call() {
        let mut rec = RecordingPainter::failing_at(1);
        let result = with_saved_state(&mut rec, |g| {
            g.move_to(0, 0)?;
            g.line_to(1, 1)?;
            g.line_to(2, 2)
        });
        assert_eq!(result.unwrap_err().to_string(), "injected failure");
        assert_eq!(rec.depth(), 0);
        assert_eq!(rec.count(OpKind::LineTo), 0);
        assert_eq!(rec.drawing_calls(), 2);
    }

    #[test]
    fn vertical_rules_are_rejected() {
        let mut rec = RecordingPainter::new();
        let err = rec
            .draw_line(Point::new(0, 0), Point::new(0, 10), 1, Color::black(), RuleStyle::Solid)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn ops_serialize_with_a_tag() {
        let json = serde_json::to_string(&Op::Translate { dx: 1, dy: 2 }).unwrap();
        assert_eq!(json, r#"{"op":"translate","dx":1,"dy":2}"#);
    }
}
