//! Trojan Source guard.
//!
//! Ties the tokenizer, scanner and diagnostics together: read a file,
//! report every discarded format control and every possible reordering,
//! then write the reconstructed text back in place.

pub mod config;

use bidi_diagnostics::Diagnostic;
use bidi_lexer::{Lexer, LexerError};
use bidi_scanner::Scanner;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

pub use bidi_scanner::ScanMode;
pub use config::{ColorWhen, GuardConfig};

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be tokenized. Carries the contents so the caller
    /// can point at the offending character.
    #[error("failed to tokenize {path:?}: {error}")]
    Lex {
        path: PathBuf,
        contents: String,
        #[source]
        error: LexerError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    NoChange,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Discards first, in source order, then findings in line order.
    pub diagnostics: Vec<Diagnostic>,
    pub output: String,
    pub outcome: Outcome,
}

impl Report {
    pub fn findings(&self) -> impl Iterator<Item = &bidi_diagnostics::Reordering> {
        self.diagnostics.iter().filter_map(Diagnostic::as_reordering)
    }
}

/// Run the full pipeline over in-memory source.
pub fn process_source(source: &str, mode: ScanMode) -> Result<Report, LexerError> {
    let tokenization = Lexer::new(source).tokenize()?;

    let mut diagnostics: Vec<Diagnostic> = tokenization
        .discarded
        .iter()
        .map(|d| Diagnostic::discarded(d.offset, d.name))
        .collect();

    let scanned = Scanner::new(mode).scan(&tokenization.tokens);
    diagnostics.extend(scanned.findings.into_iter().map(Diagnostic::from));

    let outcome = if scanned.text == source {
        diagnostics.push(Diagnostic::NoChange);
        Outcome::NoChange
    } else {
        Outcome::Changed
    };

    Ok(Report {
        diagnostics,
        output: scanned.text,
        outcome,
    })
}

/// Check `path` and rewrite it in place. The file is written even when
/// nothing changed.
pub fn process_file(path: &Path, config: &GuardConfig) -> Result<Report, GuardError> {
    let contents = fs::read_to_string(path).map_err(|source| GuardError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "read source");

    let report = match process_source(&contents, config.mode) {
        Ok(report) => report,
        Err(error) => {
            return Err(GuardError::Lex {
                path: path.to_path_buf(),
                contents,
                error,
            })
        }
    };

    write_atomically(path, &report.output)?;
    info!(
        path = %path.display(),
        findings = report.findings().count(),
        changed = report.outcome == Outcome::Changed,
        "wrote file"
    );
    Ok(report)
}

/// Replace the file behind `path`, keeping its permissions. Symlinks are
/// followed so the link survives and its target is rewritten. A file with
/// other hard links is overwritten in place so every link sees the result;
/// anything else goes through a temporary file in the same directory.
fn write_atomically(path: &Path, contents: &str) -> Result<(), GuardError> {
    let write_error = |source: io::Error| GuardError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = fs::canonicalize(path).map_err(write_error)?;
    let metadata = fs::metadata(&target).map_err(write_error)?;
    if has_other_links(&metadata) {
        debug!(path = %target.display(), "hard-linked file, writing in place");
        return fs::write(&target, contents).map_err(write_error);
    }

    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(contents.as_bytes()).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_error)?;
    temp.persist(&target).map_err(|e| write_error(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn has_other_links(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink() > 1
}

#[cfg(not(unix))]
fn has_other_links(_metadata: &fs::Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_source_is_no_change() {
        let report = process_source("fn main() {}\n", ScanMode::Fix).unwrap();
        assert_eq!(report.outcome, Outcome::NoChange);
        assert_eq!(report.diagnostics, vec![Diagnostic::NoChange]);
        assert_eq!(report.output, "fn main() {}\n");
    }

    #[test]
    fn test_discards_come_first() {
        let report = process_source("(\"ح\"\u{200F})", ScanMode::Fix).unwrap();
        assert_eq!(
            report.diagnostics[0],
            Diagnostic::discarded(5, "RIGHT-TO-LEFT MARK")
        );
        assert_eq!(report.findings().count(), 1);
        assert_eq!(report.outcome, Outcome::Changed);
        assert_eq!(report.output, "(\"ح\"\u{200E})");
    }

    #[test]
    fn test_report_mode_keeps_text() {
        let report = process_source("(\"ح\")", ScanMode::Report).unwrap();
        assert_eq!(report.findings().count(), 1);
        assert_eq!(report.outcome, Outcome::NoChange);
        assert_eq!(report.diagnostics.last(), Some(&Diagnostic::NoChange));
    }

    #[test]
    fn test_lexer_error_propagates() {
        let err = process_source("a \u{202E} b", ScanMode::Fix).unwrap_err();
        assert_eq!(err.offset(), 2);
    }
}
