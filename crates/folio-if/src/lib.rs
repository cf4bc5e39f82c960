//! Intermediate format of the Folio print renderer.
//!
//! Pages are described as a sequence of [`DocumentHandler`] calls whose page
//! content is painted through an [`IfPainter`]. Handlers serialize that
//! sequence as XML ([`XmlSerializer`]), render it to a binary page stream
//! ([`PageStreamHandler`]) or record it as a JSON trace ([`TraceHandler`]).
//! [`parse_document`] replays XML into any handler.

pub mod error;
pub mod fill;
pub mod lifecycle;
pub mod page_stream;
pub mod painter;
pub mod parser;
pub mod registry;
pub mod render;
pub mod serializer;
pub mod trace;

pub use error::IfError;
pub use page_stream::{read_page_stream, PageRecord, PageStreamHandler};
pub use painter::{DocumentHandler, IfPainter};
pub use parser::parse_document;
pub use registry::{HandlerRegistry, MIME_IF_XML, MIME_PAGE_STREAM, MIME_TRACE};
pub use render::{PageBackend, VectorPainter};
pub use serializer::XmlSerializer;
pub use trace::{TraceHandler, TracePage};
