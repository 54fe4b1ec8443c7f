//! Lexical productions.
//!
//! Each production is tried against the unconsumed remainder of the input
//! and either declines or returns its capture groups. The groups become the
//! token's atoms, so every production splits its match at the points where a
//! direction mark could later be inserted without changing how the text
//! re-lexes.

use crate::unicode::{is_identifier_continue, is_identifier_start};
use crate::TokenKind;
use std::fmt;

/// Capture groups of one successful match, in order.
///
/// Groups may be empty (an optional prefix that was absent, an empty string
/// body); empty groups never become atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures<'src> {
    /// Number of bytes the production consumed.
    pub len: usize,
    pub groups: Vec<&'src str>,
}

/// The lexical productions, in the order they are tried.
///
/// The fallback tokens (`UnlexedSyntax`, `UnlexedWhitespace`) are not
/// productions; the lexer only falls back to them when none of these match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    Identifier,
    LineComment,
    BlockComment,
    CharLiteral,
    StringLiteral,
    RawString,
    Numeric,
}

impl Production {
    pub const ALL: [Production; 7] = [
        Production::Identifier,
        Production::LineComment,
        Production::BlockComment,
        Production::CharLiteral,
        Production::StringLiteral,
        Production::RawString,
        Production::Numeric,
    ];

    /// The token category this production yields.
    pub fn kind(self) -> TokenKind {
        match self {
            Production::Identifier => TokenKind::IdentifierOrKeyword,
            Production::LineComment | Production::BlockComment => TokenKind::Comment,
            Production::CharLiteral | Production::StringLiteral | Production::RawString => {
                TokenKind::Stringy
            }
            Production::Numeric => TokenKind::Numeric,
        }
    }

    /// Try to match this production at the start of `input`.
    pub fn try_match(self, input: &str) -> Option<Captures<'_>> {
        match self {
            Production::Identifier => identifier(input),
            Production::LineComment => line_comment(input),
            Production::BlockComment => block_comment(input),
            Production::CharLiteral => char_literal(input),
            Production::StringLiteral => string_literal(input),
            Production::RawString => raw_string(input),
            Production::Numeric => numeric(input),
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Production::Identifier => "identifier",
            Production::LineComment => "line comment",
            Production::BlockComment => "block comment",
            Production::CharLiteral => "character literal",
            Production::StringLiteral => "string literal",
            Production::RawString => "raw string literal",
            Production::Numeric => "numeric literal",
        };
        f.write_str(name)
    }
}

/// `(r#)?` followed by an identifier.
///
/// A bare `b` or `r` is the prefix of a literal whenever a literal matches
/// at the same position, and is left to the literal.
fn identifier(input: &str) -> Option<Captures<'_>> {
    if let Some(rest) = input.strip_prefix("r#") {
        if let Some(name_len) = identifier_len(rest) {
            return Some(Captures {
                len: 2 + name_len,
                groups: vec![&input[..1], &input[1..2], &rest[..name_len]],
            });
        }
    }

    let len = identifier_len(input)?;
    let name = &input[..len];
    let literal_prefix = match name {
        "b" => char_literal(input).is_some() || string_literal(input).is_some(),
        "r" => raw_string(input).is_some(),
        _ => false,
    };
    if literal_prefix {
        return None;
    }
    Some(Captures {
        len,
        groups: vec![name],
    })
}

fn identifier_len(input: &str) -> Option<usize> {
    let mut chars = input.char_indices();
    let (_, first) = chars.next()?;
    if !is_identifier_start(first) {
        return None;
    }
    Some(
        chars
            .find(|&(_, c)| !is_identifier_continue(c))
            .map_or(input.len(), |(i, _)| i),
    )
}

fn line_comment(input: &str) -> Option<Captures<'_>> {
    let body = input.strip_prefix("//")?;
    let body_len = body.find('\n').unwrap_or(body.len());
    Some(Captures {
        len: 2 + body_len,
        groups: vec![&input[..2], &body[..body_len]],
    })
}

/// `/* ... */` where the body may contain further balanced block comments.
fn block_comment(input: &str) -> Option<Captures<'_>> {
    let body = input.strip_prefix("/*")?;
    let end = nested_comment_end(body)?;
    Some(Captures {
        len: 2 + end + 2,
        groups: vec![&input[..2], &body[..end], &body[end..end + 2]],
    })
}

/// Byte offset of the `*/` that closes an already-open block comment.
fn nested_comment_end(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    None
}

fn split_byte_prefix(input: &str) -> (&str, &str) {
    if input.starts_with('b') {
        input.split_at(1)
    } else {
        input.split_at(0)
    }
}

/// `b?'x'`, where the body is one plain character, `\'`, or a backslash
/// followed by anything up to the next quote.
fn char_literal(input: &str) -> Option<Captures<'_>> {
    let (prefix, quoted) = split_byte_prefix(input);
    let inner = quoted.strip_prefix('\'')?;
    let body_len = char_body_len(inner)?;
    if !inner[body_len..].starts_with('\'') {
        return None;
    }
    Some(Captures {
        len: prefix.len() + 1 + body_len + 1,
        groups: vec![
            prefix,
            &quoted[..1],
            &inner[..body_len],
            &inner[body_len..body_len + 1],
        ],
    })
}

fn char_body_len(inner: &str) -> Option<usize> {
    match inner.chars().next()? {
        '\'' => None,
        '\\' => {
            let escaped = &inner[1..];
            match escaped.strip_prefix('\'') {
                Some(rest) => rest.starts_with('\'').then_some(2),
                None => escaped.find('\'').map(|run| 1 + run),
            }
        }
        c => Some(c.len_utf8()),
    }
}

/// `b?"..."` with backslash escapes. An escaped newline does not continue
/// the literal.
fn string_literal(input: &str) -> Option<Captures<'_>> {
    let (prefix, quoted) = split_byte_prefix(input);
    let body = quoted.strip_prefix('"')?;
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                return Some(Captures {
                    len: prefix.len() + 1 + i + 1,
                    groups: vec![prefix, &quoted[..1], &body[..i], &body[i..i + 1]],
                });
            }
            '\\' => match chars.next() {
                None | Some((_, '\n')) => return None,
                Some(_) => {}
            },
            _ => {}
        }
    }
    None
}

/// `r#"..."#` with any positive number of `#`s; the closing run must repeat
/// the opening count.
fn raw_string(input: &str) -> Option<Captures<'_>> {
    let after_r = input.strip_prefix('r')?;
    let hashes = after_r.len() - after_r.trim_start_matches('#').len();
    if hashes == 0 {
        return None;
    }
    let delimiter = &after_r[..hashes];
    let body = after_r[hashes..].strip_prefix('"')?;
    let closing = format!("\"{delimiter}");
    let end = body.find(&closing)?;

    Some(Captures {
        len: 1 + hashes + 1 + end + closing.len(),
        groups: vec![
            &input[..1],
            delimiter,
            &after_r[hashes..hashes + 1],
            &body[..end],
            &body[end..end + 1],
            &body[end + 1..end + closing.len()],
        ],
    })
}

/// A digit followed by anything that could continue a number in some
/// language: dots and identifier characters.
fn numeric(input: &str) -> Option<Captures<'_>> {
    if !input.chars().next()?.is_ascii_digit() {
        return None;
    }
    let len = input[1..]
        .char_indices()
        .find(|&(_, c)| c != '.' && !is_identifier_continue(c))
        .map_or(input.len(), |(i, _)| 1 + i);
    Some(Captures {
        len,
        groups: vec![&input[..len]],
    })
}
