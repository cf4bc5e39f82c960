//! Border geometry and the graphics-painting protocol of the Folio print
//! renderer.
//!
//! [`border::BorderPainter`] turns four border edge descriptions and a box
//! into closed outlines (with elliptic corners and mitred joins) and drives a
//! [`graphics::GraphicsPainter`] to clip and fill them. Backends live in
//! [`backend`].
//!
//! All coordinates are integer millipoints, origin top-left, +Y down.

pub mod backend;
pub mod border;
pub mod coords;
pub mod error;
pub mod graphics;
pub mod logging;
pub mod paint;
pub mod traits;

pub use border::BorderPainter;
pub use error::PaintError;
pub use graphics::GraphicsPainter;
