use std::sync::Once;

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

/// How the CLI installs `env_logger`.
///
/// `env_filter` uses the `env_logger` directive syntax, e.g.
/// `"warn,folio_paint::border=trace"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: WriteStyle,
    /// Prefix records with a timestamp.
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { env_filter: None, write_style: WriteStyle::Auto, timestamps: true }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self { env_filter: Some(filter.into()), ..Self::default() }
    }

    /// The explicit filter, else `RUST_LOG`. `None` means "info".
    fn directives(&self, rust_log: Option<String>) -> Option<String> {
        self.env_filter.clone().or(rust_log).filter(|d| !d.trim().is_empty())
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` on stderr. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = Builder::new();
        match config.directives(std::env::var("RUST_LOG").ok()) {
            Some(directives) => builder.parse_filters(&directives),
            None => builder.filter_level(LevelFilter::Info),
        };
        builder.write_style(config.write_style).target(Target::Stderr);
        if !config.timestamps {
            builder.format_timestamp(None);
        }

        // A host application may own the global logger already.
        if builder.try_init().is_ok() {
            log::debug!("env_logger installed");
        }
    });
}
