use std::fmt;
use std::io;

use folio_paint::PaintError;

/// Errors raised while serializing, parsing or rendering intermediate-format
/// documents.
#[derive(Debug)]
pub enum IfError {
    /// Malformed XML or an invalid attribute. `line`/`col` are 1-based.
    Parse { message: String, line: u32, col: u32 },
    /// A document handler call arrived out of order.
    State { call: &'static str, phase: &'static str },
    /// No handler is registered for the requested MIME type.
    UnsupportedMime(String),
    Paint(PaintError),
    Io(io::Error),
    Trace(serde_json::Error),
}

impl IfError {
    pub(crate) fn parse(message: impl Into<String>, line: u32, col: u32) -> Self {
        IfError::Parse { message: message.into(), line, col }
    }
}

impl fmt::Display for IfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IfError::Parse { message, line, col } => {
                write!(f, "intermediate format error at {line}:{col}: {message}")
            }
            IfError::State { call, phase } => write!(f, "{call}() is not allowed {phase}"),
            IfError::UnsupportedMime(mime) => write!(f, "no document handler for '{mime}'"),
            IfError::Paint(e) => write!(f, "{e}"),
            IfError::Io(e) => write!(f, "I/O error: {e}"),
            IfError::Trace(e) => write!(f, "could not write trace: {e}"),
        }
    }
}

impl std::error::Error for IfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IfError::Paint(e) => Some(e),
            IfError::Io(e) => Some(e),
            IfError::Trace(e) => Some(e),
            IfError::Parse { .. } | IfError::State { .. } | IfError::UnsupportedMime(_) => None,
        }
    }
}

impl From<PaintError> for IfError {
    fn from(e: PaintError) -> Self {
        IfError::Paint(e)
    }
}

impl From<io::Error> for IfError {
    fn from(e: io::Error) -> Self {
        IfError::Io(e)
    }
}

impl From<serde_json::Error> for IfError {
    fn from(e: serde_json::Error) -> Self {
        IfError::Trace(e)
    }
}
