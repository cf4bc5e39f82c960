//! Replays intermediate-format XML into a [`DocumentHandler`].

use std::fmt::Display;
use std::str::FromStr;

use log::{debug, warn};
use roxmltree::{Document, Node};

use folio_paint::coords::{Point, Rect};
use folio_paint::paint::Color;
use folio_paint::traits::{BorderProps, BorderSet, RuleStyle};

use crate::error::IfError;
use crate::fill::parse_paint;
use crate::painter::{DocumentHandler, IfPainter};

/// Parses `xml` and replays it into `handler`, from `start_document` to
/// `end_document`.
///
/// Unknown elements are skipped with a warning. Missing or malformed
/// attributes fail with [`IfError::Parse`] carrying the element position.
pub fn parse_document(xml: &str, handler: &mut dyn DocumentHandler) -> Result<(), IfError> {
    let doc = Document::parse(xml).map_err(|e| {
        let pos = e.pos();
        IfError::parse(e.to_string(), pos.row, pos.col)
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "document" {
        return Err(error_at(root, format!("expected <document>, found <{}>", root.tag_name().name())));
    }
    debug!("replaying document into {}", handler.mime_type());

    handler.start_document()?;
    for node in elements(root) {
        match node.tag_name().name() {
            "page-sequence" => replay_page_sequence(node, handler)?,
            other => skip(node, other),
        }
    }
    handler.end_document()
}

fn replay_page_sequence(node: Node<'_, '_>, handler: &mut dyn DocumentHandler) -> Result<(), IfError> {
    handler.start_page_sequence(node.attribute("id"))?;
    for page in elements(node) {
        match page.tag_name().name() {
            "page" => replay_page(page, handler)?,
            other => skip(page, other),
        }
    }
    handler.end_page_sequence()
}

fn replay_page(node: Node<'_, '_>, handler: &mut dyn DocumentHandler) -> Result<(), IfError> {
    let index: u32 = required(node, "index")?;
    let name = node.attribute("name").unwrap_or_default();
    let size = Point::new(required(node, "width")?, required(node, "height")?);

    handler.start_page(index, name, size)?;
    for child in elements(node) {
        match child.tag_name().name() {
            "content" => {
                let painter = handler.start_page_content()?;
                replay_content(child, painter)?;
                handler.end_page_content()?;
            }
            other => skip(child, other),
        }
    }
    handler.end_page()
}

fn replay_content(node: Node<'_, '_>, painter: &mut dyn IfPainter) -> Result<(), IfError> {
    for el in elements(node) {
        match el.tag_name().name() {
            "g" => {
                let translate = match el.attribute("transform") {
                    Some(raw) => parse_translate(raw)
                        .ok_or_else(|| error_at(el, format!("unsupported transform '{raw}'")))?,
                    None => Point::zero(),
                };
                painter.start_group(translate)?;
                replay_content(el, painter)?;
                painter.end_group()?;
            }
            "clip-rect" => painter.clip_rect(rect(el)?)?,
            "clip-background" => painter.clip_background(rect(el)?, &borders(el)?)?,
            "rect" => {
                let raw: String = required(el, "fill")?;
                let fill = parse_paint(&raw).map_err(|e| error_at(el, format!("invalid 'fill': {e}")))?;
                painter.fill_rect(rect(el)?, &fill)?;
            }
            "border-rect" => {
                let inner_background = optional::<Color>(el, "inner-background-color")?;
                painter.draw_border_rect(rect(el)?, &borders(el)?, inner_background)?;
            }
            "line" => painter.draw_line(
                Point::new(required(el, "x1")?, required(el, "y1")?),
                Point::new(required(el, "x2")?, required(el, "y2")?),
                required(el, "stroke-width")?,
                required::<Color>(el, "color")?,
                optional::<RuleStyle>(el, "style")?.unwrap_or(RuleStyle::Solid),
            )?,
            other => skip(el, other),
        }
    }
    Ok(())
}

// ── helpers ─────────────────────────────────────────────────────────────────

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn position(node: Node<'_, '_>) -> (u32, u32) {
    let pos = node.document().text_pos_at(node.range().start);
    (pos.row, pos.col)
}

fn error_at(node: Node<'_, '_>, message: impl Into<String>) -> IfError {
    let (line, col) = position(node);
    IfError::parse(message, line, col)
}

fn skip(node: Node<'_, '_>, name: &str) {
    let (line, col) = position(node);
    warn!("skipping unknown element <{name}> at {line}:{col}");
}

fn optional<T>(node: Node<'_, '_>, name: &str) -> Result<Option<T>, IfError>
where
    T: FromStr,
    T::Err: Display,
{
    node.attribute(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| error_at(node, format!("invalid '{name}' value '{raw}': {e}")))
        })
        .transpose()
}

fn required<T>(node: Node<'_, '_>, name: &str) -> Result<T, IfError>
where
    T: FromStr,
    T::Err: Display,
{
    optional(node, name)?.ok_or_else(|| {
        error_at(node, format!("<{}> is missing '{name}'", node.tag_name().name()))
    })
}

fn rect(node: Node<'_, '_>) -> Result<Rect, IfError> {
    Ok(Rect::new(
        required(node, "x")?,
        required(node, "y")?,
        required(node, "width")?,
        required(node, "height")?,
    ))
}

fn borders(node: Node<'_, '_>) -> Result<BorderSet, IfError> {
    Ok(BorderSet::new(
        optional::<BorderProps>(node, "before")?,
        optional::<BorderProps>(node, "after")?,
        optional::<BorderProps>(node, "start")?,
        optional::<BorderProps>(node, "end")?,
    ))
}

/// `translate(x,y)` or `translate(x y)`.
fn parse_translate(raw: &str) -> Option<Point> {
    let args = raw.trim().strip_prefix("translate(")?.strip_suffix(')')?;
    let mut parts = args.split([',', ' ']).filter(|s| !s.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}
