//! Bidi reordering scanner.
//!
//! Walks a token stream character by character, tracking the last strong
//! bidi character on each line. When a right-to-left anchor is followed,
//! across an atom boundary, by a character that extends the right-to-left
//! run (a digit, another right-to-left letter, or a closing bracket), the
//! renderer may display the span between them out of lexical order. Such
//! spots are reported, and in [`ScanMode::Fix`] neutralised by inserting a
//! LEFT-TO-RIGHT MARK at the latest lexically safe boundary inside the run.

pub mod brackets;
mod line;

use bidi_diagnostics::{LineSnapshot, Reordering, Resolution};
use bidi_lexer::Token;
use std::sync::Arc;
use tracing::{debug, info};
use unicode_bidi::bidi_class;

pub use bidi_diagnostics::LRM;
pub use line::{LineState, StrongAnchor, StrongClass};

/// Whether fixable findings are written into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanMode {
    /// Report findings; the output is the token text unchanged.
    #[default]
    Report,
    /// Insert marks where a safe insertion point exists.
    Fix,
}

/// Reconstructed text and everything found while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub text: String,
    pub findings: Vec<Reordering>,
}

impl ScanOutput {
    pub fn fixed_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_fixed()).count()
    }

    pub fn unfixable_count(&self) -> usize {
        self.findings.iter().filter(|f| !f.is_fixable()).count()
    }
}

/// A finding on the line still being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Detection {
    anchor_column: usize,
    column: usize,
    resolution: Resolution,
}

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    mode: ScanMode,
}

impl Scanner {
    pub fn new(mode: ScanMode) -> Self {
        Self { mode }
    }

    /// Scan `tokens` in a single pass, rebuilding the text line by line.
    pub fn scan(&self, tokens: &[Token]) -> ScanOutput {
        let mut output = ScanOutput::default();
        let mut line = LineState::default();
        let mut pending = Vec::new();
        let mut line_number = 1;

        for token in tokens {
            let mnemonic = token.mnemonic();
            for atom in &token.atoms {
                let last_index = atom.text.chars().count().saturating_sub(1);

                for (i, c) in atom.text.chars().enumerate() {
                    if c == '\n' {
                        let finished = std::mem::take(&mut line);
                        finish_line(&mut output, finished, &mut pending, line_number);
                        output.text.push('\n');
                        line_number += 1;
                        continue;
                    }

                    let class = bidi_class(c);
                    let marker = if i == 0 || i == last_index { mnemonic } else { '_' };
                    line.push(c, marker);

                    if line.reorder_risk(c, class) {
                        pending.push(self.resolve(&mut line, line_number));
                    }

                    if let Some(strong) = StrongClass::of(class) {
                        line.note_strong(strong);
                    }
                }

                if atom.can_insert_mark_after {
                    line.note_mark_boundary();
                }
            }
        }
        finish_line(&mut output, line, &mut pending, line_number);

        info!(
            findings = output.findings.len(),
            fixed = output.fixed_count(),
            unfixable = output.unfixable_count(),
            "scan complete"
        );
        output
    }

    /// Decide how the finding at the current column is resolved and, in
    /// fix mode, apply the mark.
    fn resolve(&self, line: &mut LineState, line_number: usize) -> Detection {
        let anchor_column = line.last_strong_column().unwrap_or(0);
        let column = line.column;
        debug!(
            line = line_number,
            anchor = anchor_column,
            column,
            "possible reordering"
        );

        let resolution = match line.fix_position() {
            Some(insertion_column) => {
                let applied = self.mode == ScanMode::Fix;
                if applied {
                    debug!(line = line_number, column = insertion_column, "inserting LRM");
                    line.apply_mark(insertion_column, LRM);
                }
                Resolution::Fixable {
                    insertion_column,
                    applied,
                }
            }
            None => Resolution::Unfixable,
        };

        Detection {
            anchor_column,
            column,
            resolution,
        }
    }
}

/// Append a finished line to the output and attach its findings to one
/// shared snapshot of it.
fn finish_line(
    output: &mut ScanOutput,
    line: LineState,
    pending: &mut Vec<Detection>,
    line_number: usize,
) {
    output.text.push_str(line.text());
    if pending.is_empty() {
        return;
    }

    let snapshot: Arc<LineSnapshot> = Arc::new(line.into_snapshot());
    output.findings.extend(pending.drain(..).map(|d| {
        Reordering::new(
            line_number,
            d.anchor_column,
            d.column,
            d.resolution,
            Arc::clone(&snapshot),
        )
    }));
}

/// Scan `tokens` with a fresh scanner.
pub fn scan(tokens: &[Token], mode: ScanMode) -> ScanOutput {
    Scanner::new(mode).scan(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidi_lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn run(source: &str, mode: ScanMode) -> ScanOutput {
        let tokens = tokenize(source).unwrap().tokens;
        scan(&tokens, mode)
    }

    #[test]
    fn test_ascii_has_no_findings() {
        let source = "fn main() {\n    println!(\"hi {}\", [1, 2][0]);\n}\n";
        let output = run(source, ScanMode::Fix);
        assert!(output.findings.is_empty());
        assert_eq!(output.text, source);
    }

    #[test]
    fn test_string_then_paren() {
        let output = run("\"ح\")", ScanMode::Report);
        assert_eq!(output.findings.len(), 1);

        let finding = &output.findings[0];
        assert_eq!(finding.line, 1);
        assert_eq!(finding.anchor_column, 2);
        assert_eq!(finding.column, 4);
        assert_eq!(finding.source_line(), "\"ح\")");
        assert_eq!(finding.key_line(), "SSSX");
        assert_eq!(
            finding.resolution,
            Resolution::Fixable {
                insertion_column: 3,
                applied: false,
            }
        );
        assert_eq!(finding.patched_line().unwrap(), "\"ح\"\u{200E})");
        assert_eq!(finding.patched_key_line().unwrap(), "SSS X");
        // Report mode leaves the text alone.
        assert_eq!(output.text, "\"ح\")");
    }

    #[test]
    fn test_fix_inserts_mark() {
        let output = run("\"ح\")", ScanMode::Fix);
        assert_eq!(output.text, "\"ح\"\u{200E})");
        assert_eq!(output.fixed_count(), 1);

        // The finding still shows the line as it was found.
        let finding = &output.findings[0];
        assert_eq!(finding.source_line(), "\"ح\")");
        assert_eq!(finding.key_line(), "SSSX");
        assert_eq!(finding.patched_line().unwrap(), "\"ح\"\u{200E})");
    }

    #[test]
    fn test_later_findings_see_earlier_marks() {
        let output = run("(ح) (ب)", ScanMode::Fix);
        assert_eq!(output.text, "(ح\u{200E}) (ب\u{200E})");
        assert_eq!(output.findings.len(), 2);
        assert_eq!(output.findings[1].source_line(), "(ح\u{200E}) (ب)");
        assert_eq!(
            output.findings[1].patched_line().unwrap(),
            "(ح\u{200E}) (ب\u{200E})"
        );
        assert!(Arc::ptr_eq(
            output.findings[0].snapshot(),
            output.findings[1].snapshot()
        ));
    }

    #[test]
    fn test_run_inside_one_atom_is_not_flagged() {
        // The closing bracket sits in the same string body as the letter.
        let output = run("\"ح)\"", ScanMode::Report);
        assert!(output.findings.is_empty());
    }

    #[test]
    fn test_run_across_tokens_is_flagged() {
        let output = run("(ح)", ScanMode::Fix);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.text, "(ح\u{200E})");
    }

    #[test]
    fn test_rtl_identifier_then_rtl_identifier() {
        // Two identifiers separated by a space: the second letter continues
        // the run across the identifier boundary.
        let output = run("א ב", ScanMode::Report);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].column, 3);
        assert!(output.findings[0].is_fixable());
    }

    #[test]
    fn test_comment_body_is_one_atom() {
        let output = run("x // ح )", ScanMode::Fix);
        assert!(output.findings.is_empty());
    }

    #[test]
    fn test_mark_goes_after_block_comment() {
        let output = run("/*ح*/ )", ScanMode::Fix);
        assert_eq!(output.findings.len(), 1);
        assert!(output.findings[0].is_fixed());
        assert_eq!(output.text, "/*ح*/\u{200E} )");
    }

    #[test]
    fn test_whitespace_does_not_hide_the_run() {
        let output = run("ح\t)", ScanMode::Report);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].underline(), " __");
    }

    #[test]
    fn test_unfixable_when_last_boundary_precedes_anchor() {
        let scanner = Scanner::new(ScanMode::Fix);
        let mut line = LineState::default();
        for c in "ab ح)".chars() {
            line.push(c, '_');
        }
        line.last_strong = Some(StrongAnchor {
            class: StrongClass::AL,
            column: 4,
        });
        line.mark_insertion_point = 2;
        line.boundary_crossed_since_strong = true;

        let detection = scanner.resolve(&mut line, 7);
        assert_eq!(
            detection,
            Detection {
                anchor_column: 4,
                column: 5,
                resolution: Resolution::Unfixable,
            }
        );
        // Nothing was inserted.
        assert_eq!(line.text(), "ab ح)");
        assert_eq!(line.column, 5);
    }

    #[test]
    fn test_digits_inside_identifier_are_not_flagged() {
        let output = run("ح1", ScanMode::Fix);
        assert!(output.findings.is_empty());
    }

    #[test]
    fn test_number_after_rtl_identifier() {
        // `ح + 1`: the digit continues the run across the operator.
        let output = run("ح + 1", ScanMode::Fix);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.text, "ح\u{200E} + 1");
    }

    #[test]
    fn test_arabic_indic_digit_after_rtl_string() {
        // U+0663 is an Arabic number (AN); only a literal body can hold it.
        let output = run("\"ح\" + \"٣\"", ScanMode::Fix);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].column, 8);
        assert_eq!(output.text, "\"ح\"\u{200E} + \"٣\"");
    }

    #[test]
    fn test_mark_goes_after_line_comment_opener() {
        let output = run("ح //1", ScanMode::Fix);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.text, "ح //\u{200E}1");

        // Inside the comment the mark is kept and anchors the digit.
        let again = run(&output.text, ScanMode::Fix);
        assert!(again.findings.is_empty());
        assert_eq!(again.text, output.text);
    }

    #[test]
    fn test_retained_memory_is_linear() {
        let source = "ح,".repeat(4000);
        let output = run(&source, ScanMode::Report);
        assert_eq!(output.findings.len(), 3999);

        let mut snapshots: Vec<&Arc<LineSnapshot>> = Vec::new();
        for finding in &output.findings {
            if !snapshots.iter().any(|s| Arc::ptr_eq(s, finding.snapshot())) {
                snapshots.push(finding.snapshot());
            }
        }
        let retained = output.findings.len() * std::mem::size_of::<Reordering>()
            + snapshots
                .iter()
                .map(|s| s.text.len() + s.key_line.len())
                .sum::<usize>();
        assert_eq!(snapshots.len(), 1);
        assert!(retained < 64 * source.len(), "{retained} bytes retained");
    }

    #[test]
    fn test_newline_resets_state() {
        let output = run("\"ح\"\n)", ScanMode::Fix);
        assert!(output.findings.is_empty());
        assert_eq!(output.text, "\"ح\"\n)");
    }

    #[test]
    fn test_second_line_numbering() {
        let output = run("x\n\"ح\")", ScanMode::Report);
        assert_eq!(output.findings.len(), 1);
        assert_eq!(output.findings[0].line, 2);
    }

    #[test]
    fn test_trailing_partial_line_is_flushed_once() {
        let output = run("a\nb", ScanMode::Report);
        assert_eq!(output.text, "a\nb");
    }
}
