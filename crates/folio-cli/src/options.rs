use std::path::PathBuf;

use clap::Parser;

use folio_if::MIME_PAGE_STREAM;

/// Renders a Folio intermediate-format document.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "folio", version, about = "Render a Folio intermediate-format document")]
pub struct CliOptions {
    /// Intermediate-format XML to render (`-` reads stdin)
    #[arg(required_unless_present = "list_mimes")]
    pub input: Option<PathBuf>,

    /// Output file; stdout when absent
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// MIME type of the output
    #[arg(long, default_value = MIME_PAGE_STREAM)]
    pub mime: String,

    /// `env_logger` filter; falls back to `RUST_LOG`
    #[arg(long = "log")]
    pub log_filter: Option<String>,

    /// Print the supported output MIME types and exit
    #[arg(long)]
    pub list_mimes: bool,
}

impl CliOptions {
    /// True when the input is `-`.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_ref().is_some_and(|p| p.as_os_str() == "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use folio_if::MIME_TRACE;

    fn parse(args: &[&str]) -> Result<CliOptions, clap::Error> {
        CliOptions::try_parse_from(std::iter::once("folio").chain(args.iter().copied()))
    }

    #[test]
    fn input_only_uses_defaults() {
        let opts = parse(&["doc.xml"]).unwrap();
        assert_eq!(
            opts,
            CliOptions {
                input: Some("doc.xml".into()),
                output: None,
                mime: MIME_PAGE_STREAM.to_string(),
                log_filter: None,
                list_mimes: false,
            }
        );
    }

    #[test]
    fn all_options() {
        let opts = parse(&["--mime", MIME_TRACE, "--log", "debug", "-o", "out.json", "doc.xml"]).unwrap();
        assert_eq!(opts.mime, MIME_TRACE);
        assert_eq!(opts.log_filter.as_deref(), Some("debug"));
        assert_eq!(opts.output, Some(PathBuf::from("out.json")));
        assert!(!opts.reads_stdin());
    }

    #[test]
    fn list_mimes_needs_no_input() {
        let opts = parse(&["--list-mimes"]).unwrap();
        assert!(opts.list_mimes);
        assert_eq!(opts.input, None);
    }

    #[test]
    fn help_is_generated() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(parse(&[]).unwrap_err().kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse(&["doc.xml", "-o"]).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(parse(&["--frobnicate", "a"]).unwrap_err().kind(), ErrorKind::UnknownArgument);
        assert!(parse(&["a.xml", "b.xml"]).is_err());
    }

    #[test]
    fn dash_reads_stdin() {
        let opts = parse(&["-"]).unwrap();
        assert!(opts.reads_stdin());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        CliOptions::command().debug_assert();
    }
}
