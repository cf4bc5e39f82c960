//! MIME-keyed document handler lookup.

use std::collections::BTreeMap;
use std::io::Write;

use log::debug;

use crate::error::IfError;
use crate::page_stream::PageStreamHandler;
use crate::painter::DocumentHandler;
use crate::serializer::XmlSerializer;
use crate::trace::TraceHandler;

pub const MIME_IF_XML: &str = "application/X-folio-intermediate+xml";
pub const MIME_PAGE_STREAM: &str = "application/X-folio-page-stream";
pub const MIME_TRACE: &str = "application/X-folio-trace+json";

/// Builds a handler writing to the given sink.
pub type HandlerFactory = fn(Box<dyn Write>) -> Box<dyn DocumentHandler>;

#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    factories: BTreeMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the intermediate-format, page-stream and trace
    /// handlers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MIME_IF_XML, |out| Box::new(XmlSerializer::new(out)));
        registry.register(MIME_PAGE_STREAM, |out| Box::new(PageStreamHandler::new(out)));
        registry.register(MIME_TRACE, |out| Box::new(TraceHandler::new(out).pretty(true)));
        registry
    }

    /// Registers `factory` for `mime`, replacing any previous one.
    pub fn register(&mut self, mime: &str, factory: HandlerFactory) {
        if self.factories.insert(mime.to_string(), factory).is_some() {
            debug!("replaced document handler for {mime}");
        }
    }

    pub fn create(&self, mime: &str, out: Box<dyn Write>) -> Result<Box<dyn DocumentHandler>, IfError> {
        let factory = self
            .factories
            .get(mime)
            .ok_or_else(|| IfError::UnsupportedMime(mime.to_string()))?;
        Ok(factory(out))
    }

    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
