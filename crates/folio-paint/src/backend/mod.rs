//! Concrete [`GraphicsPainter`](crate::graphics::GraphicsPainter) backends.

pub mod content_stream;
pub mod recording;

pub use content_stream::{ContentStreamConfig, ContentStreamPainter};
pub use recording::{DeviceOp, Op, OpKind, RecordingPainter};
