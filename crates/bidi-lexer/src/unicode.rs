//! Character classes used by the grammar.
//!
//! `Pattern_White_Space` and `Pattern_Syntax` are immutable Unicode
//! properties, so they are spelled out here rather than pulled from a table
//! crate.

use unicode_xid::UnicodeXID;

/// Ranges of the `Pattern_Syntax` property (PropList.txt).
const PATTERN_SYNTAX: &[(char, char)] = &[
    ('\u{0021}', '\u{002F}'),
    ('\u{003A}', '\u{0040}'),
    ('\u{005B}', '\u{005E}'),
    ('\u{0060}', '\u{0060}'),
    ('\u{007B}', '\u{007E}'),
    ('\u{00A1}', '\u{00A7}'),
    ('\u{00A9}', '\u{00A9}'),
    ('\u{00AB}', '\u{00AC}'),
    ('\u{00AE}', '\u{00AE}'),
    ('\u{00B0}', '\u{00B1}'),
    ('\u{00B6}', '\u{00B6}'),
    ('\u{00BB}', '\u{00BB}'),
    ('\u{00BF}', '\u{00BF}'),
    ('\u{00D7}', '\u{00D7}'),
    ('\u{00F7}', '\u{00F7}'),
    ('\u{2010}', '\u{2027}'),
    ('\u{2030}', '\u{203E}'),
    ('\u{2041}', '\u{2053}'),
    ('\u{2055}', '\u{205E}'),
    ('\u{2190}', '\u{245F}'),
    ('\u{2500}', '\u{2775}'),
    ('\u{2794}', '\u{2BFF}'),
    ('\u{2E00}', '\u{2E7F}'),
    ('\u{3001}', '\u{3003}'),
    ('\u{3008}', '\u{3020}'),
    ('\u{3030}', '\u{3030}'),
    ('\u{FD3E}', '\u{FD3F}'),
    ('\u{FE45}', '\u{FE46}'),
];

/// `Pattern_White_Space`: tab through carriage return, space, NEL, the two
/// directional marks, and the line/paragraph separators.
pub fn is_pattern_white_space(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | '\u{0020}'
            | '\u{0085}'
            | '\u{200E}'
            | '\u{200F}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

pub fn is_pattern_syntax(c: char) -> bool {
    PATTERN_SYNTAX
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                std::cmp::Ordering::Less
            } else if lo > c {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Name of a `Pattern_White_Space` character whose general category is
/// `Cf` (format). Those are the only whitespace characters the tokenizer
/// drops.
pub fn format_control_name(c: char) -> Option<&'static str> {
    match c {
        '\u{200E}' => Some("LEFT-TO-RIGHT MARK"),
        '\u{200F}' => Some("RIGHT-TO-LEFT MARK"),
        _ => None,
    }
}

pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_xid_start()
}

pub fn is_identifier_continue(c: char) -> bool {
    c.is_xid_continue()
}
