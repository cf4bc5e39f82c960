//! JSON trace of the graphics calls each page produces.

use std::io::Write;

use log::debug;
use serde::Serialize;

use folio_paint::backend::{Op, RecordingPainter};
use folio_paint::coords::Point;

use crate::error::IfError;
use crate::lifecycle::{Lifecycle, Phase};
use crate::painter::{DocumentHandler, IfPainter};
use crate::registry::MIME_TRACE;
use crate::render::VectorPainter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracePage {
    pub index: u32,
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub ops: Vec<Op>,
}

/// Records every page with a [`RecordingPainter`] and writes the pages as a
/// JSON array when the document ends.
pub struct TraceHandler<W: Write> {
    out: W,
    lifecycle: Lifecycle,
    pages: Vec<TracePage>,
    painter: Option<VectorPainter<RecordingPainter>>,
    pretty: bool,
}

impl<W: Write> TraceHandler<W> {
    pub fn new(out: W) -> Self {
        Self { out, lifecycle: Lifecycle::default(), pages: Vec::new(), painter: None, pretty: false }
    }

    /// Indents the JSON output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Pages finished so far.
    pub fn pages(&self) -> &[TracePage] {
        &self.pages
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn current_page(&mut self, call: &'static str) -> Result<&mut TracePage, IfError> {
        self.pages.last_mut().ok_or(IfError::State { call, phase: Phase::PageSequence.description() })
    }
}

impl<W: Write> DocumentHandler for TraceHandler<W> {
    fn mime_type(&self) -> &'static str {
        MIME_TRACE
    }

    fn start_document(&mut self) -> Result<(), IfError> {
        self.lifecycle.start_document()
    }

    fn start_page_sequence(&mut self, _id: Option<&str>) -> Result<(), IfError> {
        self.lifecycle.start_page_sequence()
    }

    fn start_page(&mut self, index: u32, name: &str, size: Point) -> Result<(), IfError> {
        self.lifecycle.start_page()?;
        self.pages.push(TracePage {
            index,
            name: name.to_string(),
            width: size.x,
            height: size.y,
            ops: Vec::new(),
        });
        Ok(())
    }

    fn start_page_content(&mut self) -> Result<&mut dyn IfPainter, IfError> {
        self.lifecycle.start_page_content()?;
        Ok(self.painter.insert(VectorPainter::new(RecordingPainter::new())))
    }

    fn end_page_content(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page_content()?;
        let ops = match self.painter.take() {
            Some(painter) => painter.finish()?.into_ops(),
            None => Vec::new(),
        };
        let page = self.current_page("end_page_content")?;
        debug!("page {} recorded {} op(s)", page.index, ops.len());
        page.ops = ops;
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page()
    }

    fn end_page_sequence(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page_sequence()
    }

    fn end_document(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_document()?;
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &self.pages)?;
        } else {
            serde_json::to_writer(&mut self.out, &self.pages)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
