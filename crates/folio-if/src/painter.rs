//! Page painting and document call sequence interfaces.

use folio_paint::coords::{Point, Rect};
use folio_paint::paint::{Color, Paint};
use folio_paint::traits::{BorderSet, RuleStyle};

use crate::error::IfError;

/// Painting operations available inside page content.
pub trait IfPainter {
    /// Opens a group whose content is offset by `translate`.
    fn start_group(&mut self, translate: Point) -> Result<(), IfError>;

    /// Closes the innermost group, undoing its offset and clips.
    fn end_group(&mut self) -> Result<(), IfError>;

    fn clip_rect(&mut self, rect: Rect) -> Result<(), IfError>;

    /// Clips to the area inside the border ring of a box whose padding
    /// rectangle is `rect`.
    fn clip_background(&mut self, rect: Rect, borders: &BorderSet) -> Result<(), IfError>;

    fn fill_rect(&mut self, rect: Rect, fill: &Paint) -> Result<(), IfError>;

    /// Draws the borders of the border rectangle `rect`.
    fn draw_border_rect(
        &mut self,
        rect: Rect,
        borders: &BorderSet,
        inner_background: Option<Color>,
    ) -> Result<(), IfError>;

    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        width: i32,
        color: Color,
        style: RuleStyle,
    ) -> Result<(), IfError>;
}

/// Receives a document as a sequence of structural calls.
///
/// Calls must nest as
/// `start_document → start_page_sequence → start_page → start_page_content →
/// end_page_content → end_page → end_page_sequence → end_document`;
/// anything else fails with [`IfError::State`].
pub trait DocumentHandler {
    /// MIME type of the output this handler produces.
    fn mime_type(&self) -> &'static str;

    fn start_document(&mut self) -> Result<(), IfError>;

    fn start_page_sequence(&mut self, id: Option<&str>) -> Result<(), IfError>;

    /// `size` is the page width and height in millipoints.
    fn start_page(&mut self, index: u32, name: &str, size: Point) -> Result<(), IfError>;

    /// Returns the painter for the current page's content.
    fn start_page_content(&mut self) -> Result<&mut dyn IfPainter, IfError>;

    fn end_page_content(&mut self) -> Result<(), IfError>;

    fn end_page(&mut self) -> Result<(), IfError>;

    fn end_page_sequence(&mut self) -> Result<(), IfError>;

    /// Finishes the output and flushes it.
    fn end_document(&mut self) -> Result<(), IfError>;
}
