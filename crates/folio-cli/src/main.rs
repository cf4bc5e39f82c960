use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use folio_if::{HandlerRegistry, parse_document};
use folio_paint::logging::{LoggingConfig, init_logging};

mod options;

use options::CliOptions;

fn main() -> ExitCode {
    let opts = CliOptions::parse();
    let registry = HandlerRegistry::with_defaults();

    if opts.list_mimes {
        for mime in registry.mime_types() {
            println!("{mime}");
        }
        return ExitCode::SUCCESS;
    }

    let logging = match &opts.log_filter {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    };
    init_logging(logging);

    match run(&opts, &registry) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &CliOptions, registry: &HandlerRegistry) -> Result<()> {
    let input = opts.input.as_deref().context("missing input file")?;
    let xml = read_input(input, opts.reads_stdin())?;

    let out: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut handler = registry
        .create(&opts.mime, out)
        .with_context(|| format!("cannot render to '{}'", opts.mime))?;

    parse_document(&xml, handler.as_mut())
        .with_context(|| format!("failed to render {}", input.display()))?;

    info!("rendered {} as {}", input.display(), opts.mime);
    Ok(())
}

fn read_input(input: &Path, stdin: bool) -> Result<String> {
    if stdin {
        let mut xml = String::new();
        io::stdin().read_to_string(&mut xml).context("failed to read stdin")?;
        return Ok(xml);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}
