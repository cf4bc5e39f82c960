//! XML form of the intermediate format.

use std::borrow::Cow;
use std::io::{self, Write};

use log::{debug, warn};

use folio_paint::coords::{Point, Rect};
use folio_paint::paint::{Color, Paint};
use folio_paint::traits::{BorderSet, RuleStyle};

use crate::error::IfError;
use crate::fill::format_paint;
use crate::lifecycle::Lifecycle;
use crate::painter::{DocumentHandler, IfPainter};
use crate::registry::MIME_IF_XML;

type Attrs = Vec<(&'static str, String)>;

/// Writes the document calls it receives as intermediate-format XML.
pub struct XmlSerializer<W: Write> {
    out: W,
    lifecycle: Lifecycle,
    indent: usize,
    groups: usize,
}

pub(crate) fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut s = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            c => s.push(c),
        }
    }
    Cow::Owned(s)
}

fn rect_attrs(rect: Rect) -> Attrs {
    vec![
        ("x", rect.x().to_string()),
        ("y", rect.y().to_string()),
        ("width", rect.width().to_string()),
        ("height", rect.height().to_string()),
    ]
}

fn push_borders(attrs: &mut Attrs, borders: &BorderSet) {
    let sides = [
        ("before", &borders.before),
        ("after", &borders.after),
        ("start", &borders.start),
        ("end", &borders.end),
    ];
    for (name, side) in sides {
        if let Some(props) = side {
            attrs.push((name, props.to_string()));
        }
    }
}

impl<W: Write> XmlSerializer<W> {
    pub fn new(out: W) -> Self {
        Self { out, lifecycle: Lifecycle::default(), indent: 0, groups: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn tag(&mut self, name: &str, attrs: &[(&'static str, String)], close: &str) -> io::Result<()> {
        write!(self.out, "{:width$}<{name}", "", width = self.indent * 2)?;
        for (key, value) in attrs {
            write!(self.out, " {key}=\"{}\"", escape(value))?;
        }
        writeln!(self.out, "{close}>")
    }

    fn open(&mut self, name: &str, attrs: &[(&'static str, String)]) -> io::Result<()> {
        self.tag(name, attrs, "")?;
        self.indent += 1;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&'static str, String)]) -> io::Result<()> {
        self.tag(name, attrs, "/")
    }

    fn close(&mut self, name: &str) -> io::Result<()> {
        self.indent = self.indent.saturating_sub(1);
        writeln!(self.out, "{:width$}</{name}>", "", width = self.indent * 2)
    }
}

impl<W: Write> IfPainter for XmlSerializer<W> {
    fn start_group(&mut self, translate: Point) -> Result<(), IfError> {
        let transform = format!("translate({},{})", translate.x, translate.y);
        self.open("g", &[("transform", transform)])?;
        self.groups += 1;
        Ok(())
    }

    fn end_group(&mut self) -> Result<(), IfError> {
        if self.groups == 0 {
            return Err(IfError::State { call: "end_group", phase: "without an open group" });
        }
        self.groups -= 1;
        self.close("g")?;
        Ok(())
    }

    fn clip_rect(&mut self, rect: Rect) -> Result<(), IfError> {
        self.empty("clip-rect", &rect_attrs(rect))?;
        Ok(())
    }

    fn clip_background(&mut self, rect: Rect, borders: &BorderSet) -> Result<(), IfError> {
        let mut attrs = rect_attrs(rect);
        push_borders(&mut attrs, borders);
        self.empty("clip-background", &attrs)?;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Paint) -> Result<(), IfError> {
        let mut attrs = rect_attrs(rect);
        attrs.push(("fill", format_paint(fill)));
        self.empty("rect", &attrs)?;
        Ok(())
    }

    fn draw_border_rect(
        &mut self,
        rect: Rect,
        borders: &BorderSet,
        inner_background: Option<Color>,
    ) -> Result<(), IfError> {
        if borders.is_empty() {
            debug!("skipping border-rect without borders at {rect:?}");
            return Ok(());
        }
        let mut attrs = rect_attrs(rect);
        push_borders(&mut attrs, borders);
        if let Some(bg) = inner_background {
            attrs.push(("inner-background-color", bg.to_string()));
        }
        self.empty("border-rect", &attrs)?;
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
        let attrs = vec![
            ("x1", start.x.to_string()),
            ("y1", start.y.to_string()),
            ("x2", end.x.to_string()),
            ("y2", end.y.to_string()),
            ("stroke-width", width.to_string()),
            ("color", color.to_string()),
            ("style", style.to_string()),
        ];
        self.empty("line", &attrs)?;
        Ok(())
    }
}

impl<W: Write> DocumentHandler for XmlSerializer<W> {
    fn mime_type(&self) -> &'static str {
        MIME_IF_XML
    }

    fn start_document(&mut self) -> Result<(), IfError> {
        self.lifecycle.start_document()?;
        writeln!(self.out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        self.open("document", &[("version", "1.0".into())])?;
        Ok(())
    }

    fn start_page_sequence(&mut self, id: Option<&str>) -> Result<(), IfError> {
        self.lifecycle.start_page_sequence()?;
        let attrs: Attrs = id.map(|id| ("id", id.to_string())).into_iter().collect();
        self.open("page-sequence", &attrs)?;
        Ok(())
    }

    fn start_page(&mut self, index: u32, name: &str, size: Point) -> Result<(), IfError> {
        self.lifecycle.start_page()?;
        let attrs = vec![
            ("index", index.to_string()),
            ("name", name.to_string()),
            ("width", size.x.to_string()),
            ("height", size.y.to_string()),
        ];
        self.open("page", &attrs)?;
        Ok(())
    }

    fn start_page_content(&mut self) -> Result<&mut dyn IfPainter, IfError> {
        self.lifecycle.start_page_content()?;
        self.open("content", &[])?;
        Ok(self)
    }

    fn end_page_content(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page_content()?;
        if self.groups > 0 {
            warn!("closing {} open group(s) at the end of the page", self.groups);
        }
        while self.groups > 0 {
            self.groups -= 1;
            self.close("g")?;
        }
        self.close("content")?;
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page()?;
        self.close("page")?;
        Ok(())
    }

    fn end_page_sequence(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page_sequence()?;
        self.close("page-sequence")?;
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_document()?;
        self.close("document")?;
        self.out.flush()?;
        Ok(())
    }
}
