//! Atom tokenizer for bidi reordering checks.
//!
//! Splits source text into tokens using a small grammar that is shared by
//! most C-family languages: identifiers, comments, string and character
//! literals, and numbers. Everything else falls back to single-character
//! syntax or whitespace tokens. Each token is further split into atoms, the
//! capture groups of the production that matched it, and the atoms record
//! where a direction mark may be inserted without changing how the file
//! lexes.

pub mod grammar;
mod unicode;

use grammar::Production;
use smol_str::SmolStr;
use std::fmt;
use std::ops::Range;
use tracing::{debug, trace};

pub use unicode::{format_control_name, is_pattern_syntax, is_pattern_white_space};

/// Source span representing a byte range in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// The smallest indivisible piece of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub text: SmolStr,
    /// A direction mark may be inserted directly after this atom.
    pub can_insert_mark_after: bool,
}

impl Atom {
    pub fn new(text: impl Into<SmolStr>, can_insert_mark_after: bool) -> Self {
        Self {
            text: text.into(),
            can_insert_mark_after,
        }
    }
}

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    IdentifierOrKeyword,
    Comment,
    /// Character, byte, string and raw string literals
    Stringy,
    Numeric,
    /// A single `Pattern_Syntax` character
    UnlexedSyntax,
    /// A single `Pattern_White_Space` character
    UnlexedWhitespace,
}

impl TokenKind {
    /// One-character tag used on key lines.
    pub fn mnemonic(self) -> char {
        match self {
            TokenKind::IdentifierOrKeyword => 'I',
            TokenKind::Comment => 'C',
            TokenKind::Stringy => 'S',
            TokenKind::Numeric => 'N',
            TokenKind::UnlexedSyntax => 'X',
            TokenKind::UnlexedWhitespace => ' ',
        }
    }

    /// Check if this token came from the single-character fallback
    pub fn is_unlexed(self) -> bool {
        matches!(self, TokenKind::UnlexedSyntax | TokenKind::UnlexedWhitespace)
    }

    /// Whether a mark may follow atom `index` of a token with `count` atoms.
    ///
    /// Lexed tokens accept a mark after their last atom. Comments also
    /// accept one right after the opening `//` or `/*`, since whatever
    /// follows is still comment text.
    fn allows_mark_after(self, index: usize, count: usize) -> bool {
        match self {
            TokenKind::UnlexedSyntax | TokenKind::UnlexedWhitespace => false,
            TokenKind::Comment => index == 0 || index + 1 == count,
            _ => index + 1 == count,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::IdentifierOrKeyword => "identifier or keyword",
            TokenKind::Comment => "comment",
            TokenKind::Stringy => "string-like literal",
            TokenKind::Numeric => "numeric literal",
            TokenKind::UnlexedSyntax => "syntax character",
            TokenKind::UnlexedWhitespace => "whitespace",
        };
        f.write_str(name)
    }
}

/// A token with its kind, atoms and source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub atoms: Vec<Atom>,
    pub span: Span,
}

impl Token {
    /// Build a token from the capture groups of a match, checking that the
    /// non-empty groups spell out exactly the matched text.
    fn assemble(
        kind: TokenKind,
        offset: usize,
        matched: &str,
        groups: &[&str],
    ) -> Result<Self, LexerError> {
        let pieces: Vec<&str> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
        if pieces.is_empty() || pieces.concat() != matched {
            return Err(LexerError::AtomPartition {
                offset,
                kind,
                matched: matched.to_string(),
                atoms: pieces.iter().map(|p| p.to_string()).collect(),
            });
        }

        let count = pieces.len();
        let atoms = pieces
            .into_iter()
            .enumerate()
            .map(|(i, text)| Atom::new(text, kind.allows_mark_after(i, count)))
            .collect();

        Ok(Token {
            kind,
            atoms,
            span: Span::new(offset, offset + matched.len()),
        })
    }

    pub fn mnemonic(&self) -> char {
        self.kind.mnemonic()
    }

    /// The token's text, reassembled from its atoms.
    pub fn text(&self) -> String {
        self.atoms.iter().map(|atom| atom.text.as_str()).collect()
    }
}

/// A format character removed from the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discarded {
    /// Byte offset in the original source
    pub offset: usize,
    pub ch: char,
    /// Unicode character name
    pub name: &'static str,
}

/// Result of tokenizing a whole source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenization {
    pub tokens: Vec<Token>,
    pub discarded: Vec<Discarded>,
}

impl Tokenization {
    /// Concatenation of every token's text: the source minus discarded
    /// characters.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .flat_map(|token| token.atoms.iter())
            .map(|atom| atom.text.as_str())
            .collect()
    }
}

/// Lexer error type with detailed error messages
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Unexpected character {ch:?} at position {offset}")]
    UnexpectedCharacter { offset: usize, ch: char },

    #[error("Ambiguous grammar at position {offset}: both {first} and {second} match")]
    AmbiguousGrammar {
        offset: usize,
        first: Production,
        second: Production,
    },

    #[error("Bad atoms for {kind} at position {offset}: {atoms:?} do not spell {matched:?}")]
    AtomPartition {
        offset: usize,
        kind: TokenKind,
        matched: String,
        atoms: Vec<String>,
    },
}

impl LexerError {
    /// Byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match self {
            LexerError::UnexpectedCharacter { offset, .. }
            | LexerError::AmbiguousGrammar { offset, .. }
            | LexerError::AtomPartition { offset, .. } => *offset,
        }
    }
}

/// Lexer for source text
pub struct Lexer<'src> {
    source: &'src str,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self { source }
    }

    /// Tokenize the entire source.
    ///
    /// Format characters among the whitespace (the directional marks) are
    /// dropped from the token stream and reported in
    /// [`Tokenization::discarded`].
    pub fn tokenize(self) -> Result<Tokenization, LexerError> {
        let mut result = Tokenization::default();
        let mut offset = 0;

        while offset < self.source.len() {
            let token = self.next_token(offset)?;
            offset = token.span.end;

            if let Some(discarded) = discarded_format_char(&token) {
                debug!(offset = discarded.offset, name = discarded.name, "discarding format character");
                result.discarded.push(discarded);
                continue;
            }
            trace!(kind = ?token.kind, span = ?token.span, "token");
            result.tokens.push(token);
        }

        debug!(
            tokens = result.tokens.len(),
            discarded = result.discarded.len(),
            "tokenized source"
        );
        Ok(result)
    }

    fn next_token(&self, offset: usize) -> Result<Token, LexerError> {
        let rest = &self.source[offset..];

        let mut found: Option<(Production, grammar::Captures<'_>)> = None;
        for production in Production::ALL {
            let Some(captures) = production.try_match(rest) else {
                continue;
            };
            if let Some((first, _)) = &found {
                return Err(LexerError::AmbiguousGrammar {
                    offset,
                    first: *first,
                    second: production,
                });
            }
            found = Some((production, captures));
        }

        if let Some((production, captures)) = found {
            let kind = production.kind();
            let Some(matched) = rest.get(..captures.len) else {
                return Err(LexerError::AtomPartition {
                    offset,
                    kind,
                    matched: String::new(),
                    atoms: captures.groups.iter().map(|g| g.to_string()).collect(),
                });
            };
            return Token::assemble(kind, offset, matched, &captures.groups);
        }

        // Callers never pass an exhausted source.
        let Some(ch) = rest.chars().next() else {
            return Err(LexerError::UnexpectedCharacter { offset, ch: '\0' });
        };
        let kind = if is_pattern_white_space(ch) {
            TokenKind::UnlexedWhitespace
        } else if is_pattern_syntax(ch) {
            TokenKind::UnlexedSyntax
        } else {
            return Err(LexerError::UnexpectedCharacter { offset, ch });
        };
        let matched = &rest[..ch.len_utf8()];
        Token::assemble(kind, offset, matched, &[matched])
    }
}

fn discarded_format_char(token: &Token) -> Option<Discarded> {
    if token.kind != TokenKind::UnlexedWhitespace {
        return None;
    }
    let ch = token.atoms.first()?.text.chars().next()?;
    format_control_name(ch).map(|name| Discarded {
        offset: token.span.start,
        ch,
        name,
    })
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Tokenization, LexerError> {
    Lexer::new(source).tokenize()
}
