//! Logger installation for binaries.
//!
//! The library crates only log through the `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
