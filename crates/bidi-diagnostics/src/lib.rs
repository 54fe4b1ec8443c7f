//! Bidi Diagnostics - findings reported while checking a file for
//! reordering risks, and their terminal rendering.
//!
//! - `Diagnostic` - a reordering finding, a discarded format character, or
//!   the "no change" outcome
//! - `Reordering` - where a possible reordering was found and how it can be
//!   resolved
//! - [`overview`] - bidi-class overview rows
//! - [`render`] - terminal rendering with color support

pub mod overview;
pub mod render;

use std::sync::Arc;

pub use overview::bidi_overview;
pub use render::{render_to_string, RenderConfig, TerminalRenderer};

/// U+200E LEFT-TO-RIGHT MARK
pub const LRM: char = '\u{200E}';

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiagnosticSeverity {
    /// A possible reordering.
    #[default]
    Warning,
    /// Informational output about what the tool did.
    Note,
}

/// How a reordering finding can be neutralised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A left-to-right mark at `insertion_column` separates the run.
    Fixable {
        insertion_column: usize,
        /// Whether the mark was written into the output.
        applied: bool,
    },
    /// No lexically safe insertion point exists between the anchor and the
    /// flagged character.
    Unfixable,
}

/// A finished output line and its key line. Shared by every finding on
/// that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSnapshot {
    pub text: String,
    pub key_line: String,
}

/// A place where implicit bidi reordering may cross an atom boundary.
///
/// The line as it read when the finding was made is a prefix of the
/// finished line: marks are only ever inserted after earlier findings.
/// The rows shown for a finding are cut from the shared snapshot on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reordering {
    /// 1-based output line number.
    pub line: usize,
    /// Column of the last strong right-to-left character.
    pub anchor_column: usize,
    /// Column of the flagged character.
    pub column: usize,
    pub resolution: Resolution,
    snapshot: Arc<LineSnapshot>,
}

impl Reordering {
    pub fn new(
        line: usize,
        anchor_column: usize,
        column: usize,
        resolution: Resolution,
        snapshot: Arc<LineSnapshot>,
    ) -> Self {
        Self {
            line,
            anchor_column,
            column,
            resolution,
            snapshot,
        }
    }

    pub fn snapshot(&self) -> &Arc<LineSnapshot> {
        &self.snapshot
    }

    /// Spaces up to the anchor, then underscores to the flagged column.
    pub fn underline(&self) -> String {
        let width = self.column.saturating_sub(self.anchor_column);
        format!("{}{}", " ".repeat(self.anchor_column), "_".repeat(width))
    }

    /// The line up to and including the flagged character.
    pub fn source_line(&self) -> String {
        self.unpatched(&self.snapshot.text)
    }

    /// Token mnemonics at atom edges, `_` elsewhere.
    pub fn key_line(&self) -> String {
        self.unpatched(&self.snapshot.key_line)
    }

    /// The line with the mark inserted, if the finding is fixable.
    pub fn patched_line(&self) -> Option<String> {
        self.patched(&self.snapshot.text, LRM)
    }

    /// The key line with a blank at the inserted mark.
    pub fn patched_key_line(&self) -> Option<String> {
        self.patched(&self.snapshot.key_line, ' ')
    }

    pub fn is_fixable(&self) -> bool {
        matches!(self.resolution, Resolution::Fixable { .. })
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.resolution, Resolution::Fixable { applied: true, .. })
    }

    fn unpatched(&self, row: &str) -> String {
        match self.resolution {
            Resolution::Fixable {
                insertion_column,
                applied: true,
            } => {
                let mut text = char_prefix(row, self.column + 1).to_string();
                remove_at_column(&mut text, insertion_column);
                text
            }
            _ => char_prefix(row, self.column).to_string(),
        }
    }

    fn patched(&self, row: &str, mark: char) -> Option<String> {
        match self.resolution {
            Resolution::Fixable {
                applied: true, ..
            } => Some(char_prefix(row, self.column + 1).to_string()),
            Resolution::Fixable {
                insertion_column,
                applied: false,
            } => {
                let mut text = char_prefix(row, self.column).to_string();
                insert_at_column(&mut text, insertion_column, mark);
                Some(text)
            }
            Resolution::Unfixable => None,
        }
    }
}

/// Byte index of character `column`, or the end of `s`.
fn byte_index(s: &str, column: usize) -> usize {
    s.char_indices().nth(column).map_or(s.len(), |(i, _)| i)
}

fn char_prefix(s: &str, chars: usize) -> &str {
    &s[..byte_index(s, chars)]
}

/// Insert `c` before character `column`.
pub fn insert_at_column(s: &mut String, column: usize, c: char) {
    let index = byte_index(s, column);
    s.insert(index, c);
}

fn remove_at_column(s: &mut String, column: usize) {
    let index = byte_index(s, column);
    if index < s.len() {
        s.remove(index);
    }
}

/// Everything the checker reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Reordering(Reordering),
    /// A format character was dropped by the tokenizer.
    Discarded {
        /// Byte offset in the original source.
        offset: usize,
        /// Unicode character name.
        name: String,
    },
    /// The rewritten text is identical to the input.
    NoChange,
}

impl Diagnostic {
    pub fn discarded(offset: usize, name: impl Into<String>) -> Self {
        Diagnostic::Discarded {
            offset,
            name: name.into(),
        }
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            Diagnostic::Reordering(_) => DiagnosticSeverity::Warning,
            Diagnostic::Discarded { .. } | Diagnostic::NoChange => DiagnosticSeverity::Note,
        }
    }

    pub fn as_reordering(&self) -> Option<&Reordering> {
        match self {
            Diagnostic::Reordering(reordering) => Some(reordering),
            _ => None,
        }
    }
}

impl From<Reordering> for Diagnostic {
    fn from(reordering: Reordering) -> Self {
        Diagnostic::Reordering(reordering)
    }
}
