use std::fmt;
use std::io;

/// Errors raised while painting.
#[derive(Debug)]
pub enum PaintError {
    /// A graphics primitive failed while drawing borders or clipping a
    /// background. `operation` names the high-level call that was aborted.
    Border {
        operation: &'static str,
        source: io::Error,
    },
    /// The requested paint or style cannot be expressed by the backend.
    Unsupported(String),
    /// Any other backend I/O failure.
    Io(io::Error),
}

impl PaintError {
    pub(crate) fn border(operation: &'static str, source: io::Error) -> Self {
        PaintError::Border { operation, source }
    }
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintError::Border { operation, source } => {
                write!(f, "I/O error in {operation}(): {source}")
            }
            PaintError::Unsupported(msg) => write!(f, "not supported: {msg}"),
            PaintError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for PaintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaintError::Border { source, .. } => Some(source),
            PaintError::Io(e) => Some(e),
            PaintError::Unsupported(_) => None,
        }
    }
}

impl From<io::Error> for PaintError {
    fn from(e: io::Error) -> Self {
        PaintError::Io(e)
    }
}
