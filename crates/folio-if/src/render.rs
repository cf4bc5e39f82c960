//! Painting page content through a [`GraphicsPainter`] backend.

use std::io::{self, Write};

use log::{trace, warn};

use folio_paint::backend::{ContentStreamPainter, RecordingPainter};
use folio_paint::coords::{Point, Rect};
use folio_paint::paint::{Color, Paint};
use folio_paint::traits::{BorderSet, BorderStyle, RuleStyle};
use folio_paint::{BorderPainter, GraphicsPainter};

use crate::error::IfError;
use crate::painter::IfPainter;

/// A backend able to fill and clip rectangles.
///
/// The defaults express both with the path and border-line primitives; a
/// backend with native rectangle operators overrides them.
pub trait PageBackend: GraphicsPainter {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        let r = rect.normalized();
        // A solid line as thick as the rectangle covers it exactly.
        self.draw_border_line(
            r.x(),
            r.y(),
            r.x() + r.width(),
            r.y() + r.height(),
            true,
            true,
            BorderStyle::Solid,
            color,
        )
    }

    fn clip_rect(&mut self, rect: Rect) -> io::Result<()> {
        let r = rect.normalized();
        let (x1, y1, x2, y2) = (r.x(), r.y(), r.x() + r.width(), r.y() + r.height());
        self.move_to(x1, y1)?;
        self.line_to(x2, y1)?;
        self.line_to(x2, y2)?;
        self.line_to(x1, y2)?;
        self.close_path()?;
        self.clip()
    }
}

impl<W: Write> PageBackend for ContentStreamPainter<W> {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        ContentStreamPainter::fill_rect(self, rect, color)
    }

    fn clip_rect(&mut self, rect: Rect) -> io::Result<()> {
        ContentStreamPainter::clip_rect(self, rect)
    }
}

impl PageBackend for RecordingPainter {}

/// [`IfPainter`] that renders through a [`PageBackend`], drawing borders with
/// [`BorderPainter`].
pub struct VectorPainter<B: PageBackend> {
    backend: B,
    groups: usize,
}

impl<B: PageBackend> VectorPainter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, groups: 0 }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Closes groups left open and returns the backend.
    pub fn finish(mut self) -> Result<B, IfError> {
        if self.groups > 0 {
            warn!("{} group(s) left open at the end of the page", self.groups);
        }
        while self.groups > 0 {
            self.backend.restore_graphics_state()?;
            self.groups -= 1;
        }
        Ok(self.backend)
    }
}

impl<B: PageBackend> IfPainter for VectorPainter<B> {
    fn start_group(&mut self, translate: Point) -> Result<(), IfError> {
        self.backend.save_graphics_state()?;
        let moved = self.backend.translate_coordinates(translate.x, translate.y);
        if moved.is_err() {
            self.backend.restore_graphics_state()?;
        }
        moved?;
        self.groups += 1;
        Ok(())
    }

    fn end_group(&mut self) -> Result<(), IfError> {
        if self.groups == 0 {
            return Err(IfError::State { call: "end_group", phase: "without an open group" });
        }
        self.groups -= 1;
        self.backend.restore_graphics_state()?;
        Ok(())
    }

    fn clip_rect(&mut self, rect: Rect) -> Result<(), IfError> {
        self.backend.clip_rect(rect)?;
        Ok(())
    }

    fn clip_background(&mut self, rect: Rect, borders: &BorderSet) -> Result<(), IfError> {
        BorderPainter::new(&mut self.backend).clip_background(
            rect,
            borders.before.as_ref(),
            borders.after.as_ref(),
            borders.start.as_ref(),
            borders.end.as_ref(),
        )?;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Paint) -> Result<(), IfError> {
        let color = fill.as_solid()?;
        trace!("fill {rect:?} with {color}");
        self.backend.fill_rect(rect, color)?;
        Ok(())
    }

    fn draw_border_rect(
        &mut self,
        rect: Rect,
        borders: &BorderSet,
        inner_background: Option<Color>,
    ) -> Result<(), IfError> {
        BorderPainter::new(&mut self.backend).draw_borders(
            rect,
            borders.before.as_ref(),
            borders.after.as_ref(),
            borders.start.as_ref(),
            borders.end.as_ref(),
            inner_background,
        )?;
        Ok(())
    }

    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        width: i32,
        color: Color,
        style: RuleStyle,
    ) -> Result<(), IfError> {
        self.backend.draw_line(start, end, width, color, style)?;
        Ok(())
    }
}
