//! Bidi Guard
//!
//! Command-line interface: check one source file for Trojan Source
//! reordering and rewrite it, optionally inserting left-to-right marks.

use ariadne::{Color, Label, Report, ReportKind, Source};
use bidi_diagnostics::TerminalRenderer;
use bidi_guard::{ColorWhen, GuardConfig, GuardError};
use bidi_lexer::LexerError;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use termcolor::StandardStream;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bidi-guard")]
#[command(version)]
#[command(about = "Detect and fix bidi reordering across token boundaries", long_about = None)]
struct Cli {
    /// Source file to check; it is rewritten in place
    file: PathBuf,

    /// Mode words. `fix` inserts left-to-right marks where safe
    modes: Vec<String>,

    /// Same as the `fix` mode word
    #[arg(long)]
    fix: bool,

    /// When to color the report
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
    color: ColorWhen,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = GuardConfig::from_flags(cli.fix, &cli.modes, cli.color);

    match bidi_guard::process_file(&cli.file, &config) {
        Ok(report) => {
            let stream = StandardStream::stdout(config.color_choice());
            let mut renderer = TerminalRenderer::with_writer(config.render_config(), stream);
            match renderer.render_all(&report.diagnostics) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error writing report: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(GuardError::Lex {
            path,
            contents,
            error,
        }) => {
            report_lexer_error(&path.display().to_string(), &contents, &error);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with the report. `RUST_LOG` wins
/// over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Print a lexer error with the offending character highlighted.
fn report_lexer_error(filename: &str, source: &str, error: &LexerError) {
    // ariadne spans count characters, the lexer counts bytes.
    let start = source
        .get(..error.offset())
        .map_or(0, |prefix| prefix.chars().count());
    let span_range = start..start + 1;

    let (code, message, help) = match error {
        LexerError::UnexpectedCharacter { .. } => (
            "E0001",
            "unexpected character",
            "only Pattern_White_Space, Pattern_Syntax and the literal forms are accepted",
        ),
        LexerError::AmbiguousGrammar { .. } => (
            "E0002",
            "ambiguous tokenization",
            "two token forms match here; the grammar needs a tie-break",
        ),
        LexerError::AtomPartition { .. } => (
            "E0003",
            "atoms do not cover the token",
            "this is a tokenizer bug",
        ),
    };

    let printed = Report::build(ReportKind::Error, filename, start)
        .with_code(code)
        .with_message(message)
        .with_label(
            Label::new((filename, span_range))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .with_help(help)
        .finish()
        .eprint((filename, Source::from(source)));

    if let Err(e) = printed {
        eprintln!("Error: {error} ({e})");
    }
}
