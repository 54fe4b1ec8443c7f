//! Per-line scan state.

use crate::brackets::is_closing_bracket;
use bidi_diagnostics::{insert_at_column, LineSnapshot};
use unicode_bidi::BidiClass;

/// Strong bidi classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrongClass {
    L,
    R,
    AL,
}

impl StrongClass {
    pub fn of(class: BidiClass) -> Option<Self> {
        match class {
            BidiClass::L => Some(StrongClass::L),
            BidiClass::R => Some(StrongClass::R),
            BidiClass::AL => Some(StrongClass::AL),
            _ => None,
        }
    }

    pub fn is_right_to_left(self) -> bool {
        matches!(self, StrongClass::R | StrongClass::AL)
    }
}

/// The most recent strong character on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrongAnchor {
    pub class: StrongClass,
    pub column: usize,
}

/// State for the output line being built. Replaced with a fresh value at
/// every newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineState {
    /// Characters emitted so far on this line.
    pub column: usize,
    pub last_strong: Option<StrongAnchor>,
    /// Column just after the most recent atom that accepts a mark.
    pub mark_insertion_point: usize,
    pub boundary_crossed_since_strong: bool,
    pub(crate) text: String,
    pub(crate) key_line: String,
}

impl LineState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn key_line(&self) -> &str {
        &self.key_line
    }

    /// Column of the last strong character, if any.
    pub fn last_strong_column(&self) -> Option<usize> {
        self.last_strong.map(|anchor| anchor.column)
    }

    pub(crate) fn push(&mut self, c: char, marker: char) {
        self.column += 1;
        self.text.push(c);
        self.key_line.push(marker);
    }

    /// A right-to-left anchor followed, across an atom boundary, by a
    /// character that continues a right-to-left run.
    pub fn reorder_risk(&self, c: char, class: BidiClass) -> bool {
        let rtl_anchor = self
            .last_strong
            .is_some_and(|anchor| anchor.class.is_right_to_left());
        let continues_run = matches!(
            class,
            BidiClass::EN | BidiClass::AN | BidiClass::R | BidiClass::AL
        ) || is_closing_bracket(c);
        rtl_anchor && continues_run && self.boundary_crossed_since_strong
    }

    /// Where a mark would break the current run, if the last safe boundary
    /// lies at or after the anchor.
    pub fn fix_position(&self) -> Option<usize> {
        let anchor = self.last_strong?;
        (self.mark_insertion_point >= anchor.column).then_some(self.mark_insertion_point)
    }

    /// Insert `mark` at `column`; it becomes the new strong left-to-right
    /// anchor.
    pub(crate) fn apply_mark(&mut self, column: usize, mark: char) {
        insert_at_column(&mut self.text, column, mark);
        insert_at_column(&mut self.key_line, column, ' ');
        self.last_strong = Some(StrongAnchor {
            class: StrongClass::L,
            column,
        });
        self.column += 1;
    }

    pub(crate) fn note_strong(&mut self, class: StrongClass) {
        self.last_strong = Some(StrongAnchor {
            class,
            column: self.column,
        });
        self.boundary_crossed_since_strong = false;
    }

    pub(crate) fn note_mark_boundary(&mut self) {
        self.mark_insertion_point = self.column;
        self.boundary_crossed_since_strong = true;
    }

    /// Consume the line, keeping its text and key line.
    pub(crate) fn into_snapshot(self) -> LineSnapshot {
        LineSnapshot {
            text: self.text,
            key_line: self.key_line,
        }
    }
}
