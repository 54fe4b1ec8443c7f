//! Diagnostic rendering for terminal and other outputs.
//!
//! The `TerminalRenderer` writes the line-oriented report format: a heading
//! per finding followed by the aligned underline, overview and key rows.
//! Only headings are colored, so the aligned rows stay copy-pasteable.

use crate::overview::bidi_overview;
use crate::{Diagnostic, DiagnosticSeverity, Reordering, Resolution};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

/// Configuration for the diagnostic renderer.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to use colors.
    pub use_color: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { use_color: true }
    }
}

/// Terminal renderer for diagnostics.
pub struct TerminalRenderer<W> {
    config: RenderConfig,
    stream: W,
}

impl TerminalRenderer<StandardStream> {
    /// Creates a renderer that outputs to stdout.
    pub fn stdout(config: RenderConfig) -> Self {
        let color_choice = if config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            config,
            stream: StandardStream::stdout(color_choice),
        }
    }
}

impl<W: WriteColor> TerminalRenderer<W> {
    /// Creates a renderer over any color-capable writer.
    pub fn with_writer(config: RenderConfig, stream: W) -> Self {
        Self { config, stream }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    /// Renders a single diagnostic.
    pub fn render(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        let color = severity_color(diagnostic.severity());
        match diagnostic {
            Diagnostic::Reordering(reordering) => self.render_reordering(reordering, color),
            Diagnostic::Discarded { name, .. } => self.heading(&format!("Discarding {name}"), color),
            Diagnostic::NoChange => self.heading("No change", color),
        }
    }

    /// Renders multiple diagnostics in order.
    pub fn render_all<'a>(
        &mut self,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    ) -> io::Result<()> {
        for diagnostic in diagnostics {
            self.render(diagnostic)?;
        }
        self.stream.flush()
    }

    fn render_reordering(&mut self, reordering: &Reordering, color: Color) -> io::Result<()> {
        self.heading("Possible reordering on the following line:", color)?;
        writeln!(self.stream, "{}", reordering.underline())?;
        writeln!(self.stream, "{}", bidi_overview(&reordering.source_line()))?;
        writeln!(self.stream, "{}", reordering.key_line())?;

        match (
            reordering.resolution,
            reordering.patched_line(),
            reordering.patched_key_line(),
        ) {
            (
                Resolution::Fixable {
                    insertion_column, ..
                },
                Some(patched_line),
                Some(patched_key_line),
            ) => {
                self.heading("Can be fixed by LRM insertion:", Color::Green)?;
                writeln!(self.stream, "{}|", " ".repeat(insertion_column))?;
                writeln!(self.stream, "{}", bidi_overview(&patched_line))?;
                writeln!(self.stream, "{patched_key_line}")
            }
            _ => self.heading("Unfixable in plain text", Color::Red),
        }
    }

    fn heading(&mut self, text: &str, color: Color) -> io::Result<()> {
        if !self.config.use_color {
            return writeln!(self.stream, "{text}");
        }
        self.stream
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.stream, "{text}")?;
        self.stream.reset()?;
        writeln!(self.stream)
    }
}

/// Heading color for the first line of a diagnostic.
fn severity_color(severity: DiagnosticSeverity) -> Color {
    match severity {
        DiagnosticSeverity::Warning => Color::Yellow,
        DiagnosticSeverity::Note => Color::Cyan,
    }
}

/// Renders diagnostics as plain text.
pub fn render_to_string<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> String {
    let mut renderer =
        TerminalRenderer::with_writer(RenderConfig { use_color: false }, NoColor::new(Vec::new()));
    // Writing into a Vec cannot fail.
    let _ = renderer.render_all(diagnostics);
    String::from_utf8_lossy(&renderer.into_inner().into_inner()).into_owned()
}
