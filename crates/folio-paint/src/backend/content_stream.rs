//! Page-description content stream backend.
//!
//! Writes PDF-style content stream operators. Coordinates arrive in
//! millipoints and are written in points.

use std::io::{self, Write};

use log::warn;

use crate::coords::{Point, Rect, MPT_PER_PT};
use crate::graphics::{
    arc_to_bezier, non_horizontal_rule, with_saved_state, BezierCurvePainter, GraphicsPainter,
};
use crate::paint::Color;
use crate::traits::{BorderStyle, RuleStyle};

/// Output settings of a [`ContentStreamPainter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStreamConfig {
    /// Decimals written for point values; trailing zeros are dropped.
    pub precision: usize,
    /// Start each page with a y-flip so top-left millipoint coordinates land
    /// in a bottom-left page space.
    pub flip_y: bool,
    /// Page height in millipoints, used by the y-flip.
    pub page_height: i32,
}

impl Default for ContentStreamConfig {
    fn default() -> Self {
        Self { precision: 3, flip_y: true, page_height: 0 }
    }
}

impl ContentStreamConfig {
    pub fn for_page(page_height: i32) -> Self {
        Self { page_height, ..Self::default() }
    }
}

pub struct ContentStreamPainter<W: Write> {
    out: W,
    config: ContentStreamConfig,
}

/// Formats `v` with at most `precision` decimals.
fn format_number(v: f64, precision: usize) -> String {
    let mut s = format!("{v:.precision$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

impl<W: Write> ContentStreamPainter<W> {
    pub fn new(out: W, config: ContentStreamConfig) -> Self {
        Self { out, config }
    }

    #[inline]
    pub fn config(&self) -> &ContentStreamConfig {
        &self.config
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes the page prologue (the optional y-flip).
    pub fn begin_page(&mut self) -> io::Result<()> {
        if self.config.flip_y {
            let h = self.pt(self.config.page_height);
            writeln!(self.out, "1 0 0 -1 0 {h} cm")?;
        }
        Ok(())
    }

    /// Fills `rect` with a solid color.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        self.set_fill_color(color)?;
        let r = self.rect_args(rect);
        writeln!(self.out, "{r} re f")
    }

    /// Intersects the clip with `rect`.
    pub fn clip_rect(&mut self, rect: Rect) -> io::Result<()> {
        let r = self.rect_args(rect);
        writeln!(self.out, "{r} re W n")
    }

    // ── formatting ──────────────────────────────────────────────────────

    /// Millipoints to a point value.
    fn pt(&self, mpt: i32) -> String {
        self.num(mpt as f64 / MPT_PER_PT)
    }

    fn num(&self, points: f64) -> String {
        format_number(points, self.config.precision)
    }

    fn rect_args(&self, rect: Rect) -> String {
        let r = rect.normalized();
        format!("{} {} {} {}", self.pt(r.x()), self.pt(r.y()), self.pt(r.width()), self.pt(r.height()))
    }

    fn color_args(color: Color) -> String {
        let [r, g, b] = color.to_unit_rgb();
        format!(
            "{} {} {}",
            format_number(r as f64, 3),
            format_number(g as f64, 3),
            format_number(b as f64, 3)
        )
    }

    // ── state helpers ───────────────────────────────────────────────────

    fn set_stroke_color(&mut self, color: Color) -> io::Result<()> {
        writeln!(self.out, "{} RG", Self::color_args(color))
    }

    fn set_fill_color(&mut self, color: Color) -> io::Result<()> {
        writeln!(self.out, "{} rg", Self::color_args(color))
    }

    fn set_solid_line(&mut self) -> io::Result<()> {
        writeln!(self.out, "[] 0 d")
    }

    fn set_dash(&mut self, pattern: &[f64]) -> io::Result<()> {
        let parts: Vec<String> = pattern.iter().map(|&v| self.num(v)).collect();
        writeln!(self.out, "[{}] 0 d", parts.join(" "))
    }

    fn set_round_cap(&mut self) -> io::Result<()> {
        writeln!(self.out, "1 J")
    }

    fn set_line_width(&mut self, points: f64) -> io::Result<()> {
        writeln!(self.out, "{} w", self.num(points))
    }

    /// Strokes a straight line; coordinates in points.
    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> io::Result<()> {
        let (x1, y1, x2, y2) = (self.num(x1), self.num(y1), self.num(x2), self.num(y2));
        writeln!(self.out, "{x1} {y1} m {x2} {y2} l S")
    }

    /// Fills the polygon through `points` (millipoints).
    fn fill_polygon(&mut self, points: &[(i32, i32)]) -> io::Result<()> {
        for (i, &(x, y)) in points.iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            let (x, y) = (self.pt(x), self.pt(y));
            writeln!(self.out, "{x} {y} {op}")?;
        }
        writeln!(self.out, "h f")
    }

    /// Dash unit so that an odd number of dashes spans `length`.
    fn dash_unit(length: f64, thickness: f64) -> f64 {
        let unit = (2.0 * thickness).abs();
        if unit == 0.0 {
            return length;
        }
        let mut rep = (length / unit) as i64;
        if rep % 2 == 0 {
            rep += 1;
        }
        length / rep as f64
    }

    #[allow(clippy::too_many_arguments)]
    fn border_line_points(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        horizontal: bool,
        start_or_before: bool,
        style: BorderStyle,
        color: Color,
    ) -> io::Result<()> {
        let w = x2 - x1;
        let h = y2 - y1;
        // Thickness across the line and the stroke centered in it.
        let (thickness, length) = if horizontal { (h, w) } else { (w, h) };
        let along = |p: &mut Self, offset: f64| {
            if horizontal {
                p.stroke_line(x1, y1 + offset, x2, y1 + offset)
            } else {
                p.stroke_line(x1 + offset, y1, x1 + offset, y2)
            }
        };

        match style {
            BorderStyle::None | BorderStyle::Hidden => Ok(()),
            BorderStyle::Dashed => {
                self.set_stroke_color(color)?;
                let unit = Self::dash_unit(length, thickness);
                self.set_dash(&[unit])?;
                self.set_line_width(thickness)?;
                along(self, thickness / 2.0)
            }
            BorderStyle::Dotted => {
                self.set_stroke_color(color)?;
                self.set_round_cap()?;
                let unit = Self::dash_unit(length, thickness);
                self.set_dash(&[0.0, unit])?;
                self.set_line_width(thickness)?;
                along(self, thickness / 2.0)
            }
            BorderStyle::Double => {
                self.set_stroke_color(color)?;
                self.set_solid_line()?;
                let third = thickness / 3.0;
                self.set_line_width(third)?;
                along(self, third / 2.0)?;
                along(self, third / 2.0 + 2.0 * third)
            }
            BorderStyle::Groove | BorderStyle::Ridge => {
                let factor = if style == BorderStyle::Groove { 0.4 } else { -0.4 };
                self.set_solid_line()?;
                let third = thickness / 3.0;
                self.set_line_width(third)?;
                self.set_stroke_color(color.lighten(-factor))?;
                along(self, third / 2.0)?;
                self.set_stroke_color(color)?;
                along(self, third / 2.0 + third)?;
                self.set_stroke_color(color.lighten(factor))?;
                along(self, third / 2.0 + 2.0 * third)
            }
            BorderStyle::Inset | BorderStyle::Outset => {
                let factor = if style == BorderStyle::Outset { 0.4 } else { -0.4 };
                let sign = if start_or_before { 1.0 } else { -1.0 };
                self.set_solid_line()?;
                self.set_line_width(thickness)?;
                self.set_stroke_color(color.lighten(sign * factor))?;
                along(self, thickness / 2.0)
            }
            BorderStyle::Solid => {
                self.set_stroke_color(color)?;
                self.set_solid_line()?;
                self.set_line_width(thickness)?;
                along(self, thickness / 2.0)
            }
        }
    }
}

impl<W: Write> BezierCurvePainter for ContentStreamPainter<W> {
    fn cubic_bezier_to(&mut self, p1: Point, p2: Point, p3: Point) -> io::Result<()> {
        let args = [p1.x, p1.y, p2.x, p2.y, p3.x, p3.y].map(|v| self.pt(v)).join(" ");
        writeln!(self.out, "{args} c")
    }
}

impl<W: Write> GraphicsPainter for ContentStreamPainter<W> {
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
        let (x1, x2) = (x1.min(x2), x1.max(x2));
        let (y1, y2) = (y1.min(y2), y1.max(y2));
        let p = |v: i32| v as f64 / MPT_PER_PT;
        self.border_line_points(p(x1), p(y1), p(x2), p(y2), horizontal, start_or_before, style, color)
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
        if style == RuleStyle::None {
            warn!("rule style 'none' draws nothing");
            return Ok(());
        }
        with_saved_state(self, |p| {
            let half = width / 2;
            let top = start.y - half;
            match style {
                RuleStyle::Solid | RuleStyle::Dashed | RuleStyle::Double => p.draw_border_line(
                    start.x,
                    top,
                    end.x,
                    end.y + half,
                    true,
                    true,
                    style.as_border_style(),
                    color,
                ),
                RuleStyle::Dotted => {
                    p.clip_rect(Rect::new(start.x, top, end.x - start.x, width))?;
                    // Moves the dots right by half a dot.
                    p.translate_coordinates(half, 0)?;
                    p.draw_border_line(start.x, top, end.x, end.y + half, true, true, BorderStyle::Dotted, color)
                }
                RuleStyle::Groove | RuleStyle::Ridge => {
                    let (xs, xe, ys) = (start.x, end.x, start.y);
                    p.set_fill_color(color.lighten(0.6))?;
                    p.fill_polygon(&[(xs, ys), (xe, ys), (xe, top + 2 * half), (xs, top + 2 * half)])?;
                    p.set_fill_color(color)?;
                    if style == RuleStyle::Groove {
                        p.fill_polygon(&[
                            (xs, ys),
                            (xe, ys),
                            (xe, ys + half),
                            (xs + half, ys + half),
                            (xs, ys + 2 * half),
                        ])
                    } else {
                        p.fill_polygon(&[
                            (xe, ys),
                            (xe, ys + 2 * half),
                            (xs, ys + 2 * half),
                            (xs, ys + half),
                            (xe - half, ys + half),
                        ])
                    }
                }
                RuleStyle::None => Ok(()),
            }
        })
    }

    fn move_to(&mut self, x: i32, y: i32) -> io::Result<()> {
        let (x, y) = (self.pt(x), self.pt(y));
        writeln!(self.out, "{x} {y} m")
    }

    fn line_to(&mut self, x: i32, y: i32) -> io::Result<()> {
        let (x, y) = (self.pt(x), self.pt(y));
        writeln!(self.out, "{x} {y} l")
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
        arc_to_bezier(self, start_angle, end_angle, cx, cy, rx, ry)
    }

    fn rotate_coordinates(&mut self, angle: f64) -> io::Result<()> {
        let (s, c) = angle.sin_cos();
        let coeff = |v: f64| format_number(v, 6);
        writeln!(self.out, "{} {} {} {} 0 0 cm", coeff(c), coeff(s), coeff(-s), coeff(c))
    }

    fn translate_coordinates(&mut self, dx: i32, dy: i32) -> io::Result<()> {
        let (dx, dy) = (self.pt(dx), self.pt(dy));
        writeln!(self.out, "1 0 0 1 {dx} {dy} cm")
    }

    fn scale_coordinates(&mut self, sx: f32, sy: f32) -> io::Result<()> {
        let coeff = |v: f32| format_number(v as f64, 6);
        writeln!(self.out, "{} 0 0 {} 0 0 cm", coeff(sx), coeff(sy))
    }

    fn close_path(&mut self) -> io::Result<()> {
        writeln!(self.out, "h")
    }

    fn clip(&mut self) -> io::Result<()> {
        writeln!(self.out, "W n")
    }

    fn save_graphics_state(&mut self) -> io::Result<()> {
        writeln!(self.out, "q")
    }

    fn restore_graphics_state(&mut self) -> io::Result<()> {
        writeln!(self.out, "Q")
    }
}
