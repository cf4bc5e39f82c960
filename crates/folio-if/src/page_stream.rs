//! Binary page-description stream.
//!
//! Layout: `FOLIO\0` + version byte, then per page a [`PageHeader`] followed
//! by `length` bytes of content stream, then a trailer (`END\0` + page
//! count). All integers are little-endian.

use std::io::{self, Write};

use bytemuck::{Pod, Zeroable};
use log::{debug, info};

use folio_paint::backend::{ContentStreamConfig, ContentStreamPainter};
use folio_paint::coords::Point;

use crate::error::IfError;
use crate::lifecycle::{Lifecycle, Phase};
use crate::painter::{DocumentHandler, IfPainter};
use crate::registry::MIME_PAGE_STREAM;
use crate::render::VectorPainter;

pub const MAGIC: &[u8; 6] = b"FOLIO\0";
pub const VERSION: u8 = 1;
const TRAILER_MARKER: [u8; 4] = *b"END\0";

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct PageHeader {
    pub index: u32,
    pub width: i32,
    pub height: i32,
    /// Content length in bytes.
    pub length: u32,
}

impl PageHeader {
    const SIZE: usize = size_of::<PageHeader>();

    fn to_le(self) -> Self {
        Self {
            index: self.index.to_le(),
            width: self.width.to_le(),
            height: self.height.to_le(),
            length: self.length.to_le(),
        }
    }

    fn from_le(raw: Self) -> Self {
        Self {
            index: u32::from_le(raw.index),
            width: i32::from_le(raw.width),
            height: i32::from_le(raw.height),
            length: u32::from_le(raw.length),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Trailer {
    marker: [u8; 4],
    page_count: u32,
}

const TRAILER_SIZE: usize = size_of::<Trailer>();

/// One page read back from a page stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub header: PageHeader,
    pub content: Vec<u8>,
}

impl PageRecord {
    pub fn content_str(&self) -> Result<&str, IfError> {
        std::str::from_utf8(&self.content).map_err(|e| invalid(format!("page content is not UTF-8: {e}")))
    }
}

type PagePainter = VectorPainter<ContentStreamPainter<Vec<u8>>>;

struct OpenPage {
    index: u32,
    size: Point,
    painter: Option<PagePainter>,
    content: Vec<u8>,
}

/// Renders every page to a content stream and writes the framed result to
/// `out`.
pub struct PageStreamHandler<W: Write> {
    out: W,
    lifecycle: Lifecycle,
    page: Option<OpenPage>,
    page_count: u32,
}

impl<W: Write> PageStreamHandler<W> {
    pub fn new(out: W) -> Self {
        Self { out, lifecycle: Lifecycle::default(), page: None, page_count: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn open_page(&mut self, call: &'static str) -> Result<&mut OpenPage, IfError> {
        self.page.as_mut().ok_or(IfError::State { call, phase: Phase::PageSequence.description() })
    }
}

impl<W: Write> DocumentHandler for PageStreamHandler<W> {
    fn mime_type(&self) -> &'static str {
        MIME_PAGE_STREAM
    }

    fn start_document(&mut self) -> Result<(), IfError> {
        self.lifecycle.start_document()?;
        self.out.write_all(MAGIC)?;
        self.out.write_all(&[VERSION])?;
        Ok(())
    }

    fn start_page_sequence(&mut self, id: Option<&str>) -> Result<(), IfError> {
        self.lifecycle.start_page_sequence()?;
        debug!("page sequence {}", id.unwrap_or("<anonymous>"));
        Ok(())
    }

    fn start_page(&mut self, index: u32, name: &str, size: Point) -> Result<(), IfError> {
        self.lifecycle.start_page()?;
        debug!("page {index} ('{name}') {}x{}", size.x, size.y);
        self.page = Some(OpenPage { index, size, painter: None, content: Vec::new() });
        Ok(())
    }

    fn start_page_content(&mut self) -> Result<&mut dyn IfPainter, IfError> {
        self.lifecycle.start_page_content()?;
        let page = self.open_page("start_page_content")?;
        let mut backend = ContentStreamPainter::new(Vec::new(), ContentStreamConfig::for_page(page.size.y));
        backend.begin_page()?;
        Ok(page.painter.insert(VectorPainter::new(backend)))
    }

    fn end_page_content(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page_content()?;
        let page = self.open_page("end_page_content")?;
        if let Some(painter) = page.painter.take() {
            page.content = painter.finish()?.into_inner();
        }
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page()?;
        let page = self.page.take().ok_or(IfError::State {
            call: "end_page",
            phase: Phase::PageSequence.description(),
        })?;
        let length = u32::try_from(page.content.len())
            .map_err(|_| invalid(format!("page {} content exceeds 4 GiB", page.index)))?;
        let header = PageHeader { index: page.index, width: page.size.x, height: page.size.y, length };
        self.out.write_all(bytemuck::bytes_of(&header.to_le()))?;
        self.out.write_all(&page.content)?;
        self.page_count += 1;
        Ok(())
    }

    fn end_page_sequence(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_page_sequence()
    }

    fn end_document(&mut self) -> Result<(), IfError> {
        self.lifecycle.end_document()?;
        let trailer = Trailer { marker: TRAILER_MARKER, page_count: self.page_count.to_le() };
        self.out.write_all(bytemuck::bytes_of(&trailer))?;
        self.out.flush()?;
        info!("wrote {} page(s)", self.page_count);
        Ok(())
    }
}

fn invalid(message: String) -> IfError {
    IfError::Io(io::Error::new(io::ErrorKind::InvalidData, message))
}

/// Splits a page stream back into its pages, checking the framing and the
/// trailer's page count.
pub fn read_page_stream(bytes: &[u8]) -> Result<Vec<PageRecord>, IfError> {
    let rest = bytes
        .strip_prefix(MAGIC.as_slice())
        .ok_or_else(|| invalid("not a page stream: bad magic".into()))?;
    let (&version, mut rest) = rest
        .split_first()
        .ok_or_else(|| invalid("truncated page stream header".into()))?;
    if version != VERSION {
        return Err(invalid(format!("unsupported page stream version {version}")));
    }

    let mut pages = Vec::new();
    loop {
        if rest.starts_with(&TRAILER_MARKER) {
            break;
        }
        if rest.len() < PageHeader::SIZE {
            return Err(invalid(format!("truncated header of page {}", pages.len())));
        }
        let (raw, tail) = rest.split_at(PageHeader::SIZE);
        let header = PageHeader::from_le(bytemuck::pod_read_unaligned(raw));
        let length = header.length as usize;
        if tail.len() < length {
            return Err(invalid(format!("truncated content of page {}", header.index)));
        }
        let (content, tail) = tail.split_at(length);
        pages.push(PageRecord { header, content: content.to_vec() });
        rest = tail;
    }

    if rest.len() != TRAILER_SIZE {
        return Err(invalid("malformed page stream trailer".into()));
    }
    let trailer: Trailer = bytemuck::pod_read_unaligned(rest);
    let page_count = u32::from_le(trailer.page_count) as usize;
    if page_count != pages.len() {
        return Err(invalid(format!("trailer announces {page_count} page(s), found {}", pages.len())));
    }
    Ok(pages)
}
