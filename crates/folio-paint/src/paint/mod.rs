//! Colors and fill sources.

mod color;
mod gradient;

pub use color::{Color, ColorParseError};
pub use gradient::{ColorStop, LinearGradient};

use crate::error::PaintError;

/// What a `rect` element is filled with.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    /// Returns the solid color, or fails for paint kinds a solid-only
    /// backend cannot express.
    pub fn as_solid(&self) -> Result<Color, PaintError> {
        match self {
            Paint::Solid(c) => Ok(*c),
            Paint::LinearGradient(_) => Err(PaintError::Unsupported(
                "only solid color fills are supported".into(),
            )),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}
