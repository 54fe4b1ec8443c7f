//! Bidi-class overview rows.
//!
//! An overview row replaces every character that could affect bidi layout
//! with a one-letter summary of its bidi class, so reviewers can see where
//! the strong right-to-left characters sit on a line that their terminal
//! would itself reorder.

use regex::Regex;
use std::sync::OnceLock;
use unicode_bidi::{bidi_class, BidiClass};

/// Render `text` as an overview row.
///
/// Characters above U+0080 and uppercase ASCII letters become their class
/// letter (see [`class_letter`]); everything else passes through, so the
/// row stays aligned with the source line.
pub fn bidi_overview(text: &str) -> String {
    text.chars().map(overview_char).collect()
}

pub fn overview_char(c: char) -> char {
    if c as u32 > 0x80 || c.is_ascii_uppercase() {
        if is_unassigned(c) {
            // The bidi tables give unassigned code points a block default.
            'U'
        } else {
            class_letter(bidi_class(c))
        }
    } else {
        c
    }
}

/// General category `Cn`.
fn is_unassigned(c: char) -> bool {
    static UNASSIGNED: OnceLock<Option<Regex>> = OnceLock::new();
    UNASSIGNED
        .get_or_init(|| Regex::new(r"^\p{Cn}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(c.encode_utf8(&mut [0; 4])))
}

/// Single-letter form of a bidi class: `L`, `R`, `B` and `S` stand for
/// themselves, `AL` folds into `R`, and every other class is `U`.
pub fn class_letter(class: BidiClass) -> char {
    match class {
        BidiClass::L => 'L',
        BidiClass::R | BidiClass::AL => 'R',
        BidiClass::B => 'B',
        BidiClass::S => 'S',
        _ => 'U',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(bidi_overview("let x = 1;"), "let x = 1;");
    }

    #[test]
    fn test_uppercase_ascii_is_classified() {
        assert_eq!(bidi_overview("Foo"), "Loo");
    }

    #[test]
    fn test_rtl_letters() {
        // Hebrew alef is R, Arabic hah is AL; both show as R.
        assert_eq!(bidi_overview("\"א\" ح"), "\"R\" R");
    }

    #[test]
    fn test_other_classes() {
        // Arabic-indic digit (AN), left-to-right mark (L), no-break space (CS).
        assert_eq!(bidi_overview("٣\u{200E}\u{00A0}"), "ULU");
        assert_eq!(bidi_overview("\u{2029}"), "B");
    }

    #[test]
    fn test_unassigned_code_points() {
        // U+0378 would default to L, U+05FF (Hebrew block) to R.
        assert_eq!(bidi_overview("\u{378}\u{5FF}\u{10FFFF}"), "UUU");
        assert!(is_unassigned('\u{378}'));
        assert!(!is_unassigned('א'));
        // Private use is assigned and left-to-right.
        assert_eq!(overview_char('\u{E000}'), 'L');
    }

    #[test]
    fn test_class_letter() {
        assert_eq!(class_letter(BidiClass::AL), 'R');
        assert_eq!(class_letter(BidiClass::EN), 'U');
        assert_eq!(class_letter(BidiClass::S), 'S');
    }
}
