/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The component value tree this crate transforms.
//!
//! Tokenization itself happens upstream; declarations arrive here as trees of
//! [`Token`]s, with block and function tokens owning their children. Tokens
//! remember whether source whitespace preceded or followed them, which is all
//! the serializer needs to reconstruct (or minify) spacing.

use std::fmt::{self, Write};

use bitflags::bitflags;
use smallvec::SmallVec;

/// The component values of one declaration, inline up to the common case.
pub type TokenList = SmallVec<[Token; 4]>;

bitflags! {
    /// Whitespace adjacency recorded by the tokenizer.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Whitespace: u8 {
        /// Whitespace appeared before this token.
        const BEFORE = 1 << 0;
        /// Whitespace appeared after this token.
        const AFTER = 1 << 1;
    }
}

/// A line / column pair indicating a source position.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SourceLocation {
    /// The line number, starting at 0.
    pub line: u32,
    /// The column number within a line, starting at 0.
    pub column: u32,
}

/// The kind of a component value.
///
/// <https://drafts.csswg.org/css-syntax/#tokenization>
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// An identifier.
    Ident,
    /// A function token. `text` is the name, `children` the arguments.
    Function,
    /// A `#…` token. `text` excludes the leading `#`.
    Hash,
    /// A quoted string. `text` is the decoded content.
    QuotedString,
    /// A number. `text` is the literal representation.
    Number,
    /// A percentage. `text` is the literal without the `%` sign.
    Percentage,
    /// A dimension such as `12px`. `text` includes the unit, which starts at
    /// `unit_offset`.
    Dimension,
    /// A `(…)` block.
    ParenthesisBlock,
    /// A `[…]` block.
    SquareBracketBlock,
    /// A `{…}` block.
    CurlyBracketBlock,
    /// A `,` token.
    Comma,
    /// Any other single code point. `text` is that code point.
    Delim,
}

impl TokenKind {
    /// Whether tokens of this kind own children.
    #[inline]
    pub fn is_grouping(self) -> bool {
        matches!(
            self,
            TokenKind::Function |
                TokenKind::ParenthesisBlock |
                TokenKind::SquareBracketBlock |
                TokenKind::CurlyBracketBlock
        )
    }

    /// Whether this is a number, percentage or dimension.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::Percentage | TokenKind::Dimension
        )
    }
}

/// A single component value.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The kind of this token.
    pub kind: TokenKind,
    /// The decoded text, with kind-specific conventions (see [`TokenKind`]).
    pub text: String,
    /// Child component values. `Some` if and only if the kind is grouping.
    pub children: Option<Vec<Token>>,
    /// Source whitespace adjacency.
    pub whitespace: Whitespace,
    /// The position of this token in the source.
    pub location: SourceLocation,
    /// For dimensions, the byte offset of the unit within `text`.
    pub unit_offset: u16,
}

impl Token {
    /// Makes a childless token of the given kind.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        debug_assert!(!kind.is_grouping());
        Self {
            kind,
            text: text.into(),
            children: None,
            whitespace: Whitespace::empty(),
            location: SourceLocation::default(),
            unit_offset: 0,
        }
    }

    /// Makes an identifier token.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Ident, name)
    }

    /// Makes a function token with the given name and arguments.
    pub fn function(name: impl Into<String>, children: Vec<Token>) -> Self {
        Self {
            kind: TokenKind::Function,
            text: name.into(),
            children: Some(children),
            whitespace: Whitespace::empty(),
            location: SourceLocation::default(),
            unit_offset: 0,
        }
    }

    /// Makes a hash token. `text` excludes the `#`.
    pub fn hash(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Hash, text)
    }

    /// Makes a number token from already-serialized text.
    pub fn number(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Number, text)
    }

    /// Makes a percentage token. `text` excludes the `%`.
    pub fn percentage(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Percentage, text)
    }

    /// Makes a dimension token from already-serialized value text and a unit.
    pub fn dimension(value: &str, unit: &str) -> Self {
        let mut token = Self::new(TokenKind::Dimension, format!("{}{}", value, unit));
        token.unit_offset = value.len() as u16;
        token
    }

    /// Makes a `(…)` block token with the given children.
    pub fn parenthesis_block(children: Vec<Token>) -> Self {
        Self {
            kind: TokenKind::ParenthesisBlock,
            text: String::new(),
            children: Some(children),
            whitespace: Whitespace::empty(),
            location: SourceLocation::default(),
            unit_offset: 0,
        }
    }

    /// Makes a `,` token.
    pub fn comma() -> Self {
        Self::new(TokenKind::Comma, ",")
    }

    /// Makes a delimiter token for the given code point.
    pub fn delim(c: char) -> Self {
        Self::new(TokenKind::Delim, c.to_string())
    }

    /// Returns the value of a number token.
    pub fn number_value(&self) -> Option<f64> {
        if self.kind != TokenKind::Number {
            return None;
        }
        self.text.parse().ok()
    }

    /// Returns the value of a percentage token, in its source scale (`50` for
    /// `50%`).
    pub fn percentage_value(&self) -> Option<f64> {
        if self.kind != TokenKind::Percentage {
            return None;
        }
        self.text.parse().ok()
    }

    /// Returns the numeric part of a dimension token.
    pub fn dimension_value(&self) -> Option<f64> {
        if self.kind != TokenKind::Dimension {
            return None;
        }
        self.text[..self.unit_offset as usize].parse().ok()
    }

    /// Returns the unit of a dimension token, or `""` for other kinds.
    pub fn dimension_unit(&self) -> &str {
        if self.kind != TokenKind::Dimension {
            return "";
        }
        &self.text[self.unit_offset as usize..]
    }

    /// Returns the value of any numeric token, ignoring percent and unit.
    pub fn numeric_value(&self) -> Option<f64> {
        match self.kind {
            TokenKind::Number => self.number_value(),
            TokenKind::Percentage => self.percentage_value(),
            TokenKind::Dimension => self.dimension_value(),
            _ => None,
        }
    }

    /// Whether this is a number or dimension with value zero.
    pub fn is_zero_length(&self) -> bool {
        matches!(self.kind, TokenKind::Number | TokenKind::Dimension) &&
            self.numeric_value() == Some(0.0)
    }

    /// Whether this is the given delimiter.
    pub fn is_delim(&self, c: char) -> bool {
        self.kind == TokenKind::Delim && self.text.len() == c.len_utf8() && self.text.starts_with(c)
    }

    /// Returns the name of a function token.
    pub fn function_name(&self) -> Option<&str> {
        if self.kind == TokenKind::Function {
            Some(&self.text)
        } else {
            None
        }
    }

    /// Whether this is a function token with the given name,
    /// ASCII-case-insensitively.
    pub fn is_function(&self, name: &str) -> bool {
        self.kind == TokenKind::Function && self.text.eq_ignore_ascii_case(name)
    }

    /// Structural equality, ignoring whitespace bits and locations.
    pub fn eq_ignoring_whitespace(&self, other: &Token) -> bool {
        if self.kind != other.kind || self.text != other.text || self.unit_offset != other.unit_offset
        {
            return false;
        }
        match (&self.children, &other.children) {
            (None, None) => true,
            (Some(a), Some(b)) => slices_eq_ignoring_whitespace(a, b),
            _ => false,
        }
    }

    /// Sets the whitespace bits, builder-style.
    pub fn with_whitespace(mut self, whitespace: Whitespace) -> Self {
        self.whitespace = whitespace;
        self
    }
}

/// Whether `var()` occurs anywhere in this token tree. Values with pending
/// substitutions cannot be understood before substitution happens.
pub fn contains_var(token: &Token) -> bool {
    token.is_function("var") ||
        token
            .children
            .as_deref()
            .is_some_and(|children| children.iter().any(contains_var))
}

/// Structural equality of two token slices, ignoring whitespace.
pub fn slices_eq_ignoring_whitespace(a: &[Token], b: &[Token]) -> bool {
    a.len() == b.len() &&
        a.iter()
            .zip(b.iter())
            .all(|(a, b)| a.eq_ignoring_whitespace(b))
}

/// Serialization of a value to CSS syntax.
pub trait ToCss {
    /// Serialize `self` in CSS syntax, writing to `dest`.
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result;

    /// Serialize `self` in CSS syntax and return a string.
    fn to_css_string(&self) -> String {
        let mut s = String::new();
        self.to_css(&mut s)
            .expect("writing to a string is infallible");
        s
    }
}

impl ToCss for Token {
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        match self.kind {
            TokenKind::Ident | TokenKind::Number | TokenKind::Dimension | TokenKind::Delim => {
                dest.write_str(&self.text)
            },
            TokenKind::Function => {
                dest.write_str(&self.text)?;
                dest.write_char('(')?;
                if let Some(children) = &self.children {
                    children.to_css(dest)?;
                }
                dest.write_char(')')
            },
            TokenKind::Hash => {
                dest.write_char('#')?;
                dest.write_str(&self.text)
            },
            TokenKind::QuotedString => {
                dest.write_char('"')?;
                dest.write_str(&self.text)?;
                dest.write_char('"')
            },
            TokenKind::Percentage => {
                dest.write_str(&self.text)?;
                dest.write_char('%')
            },
            TokenKind::ParenthesisBlock => self.block_to_css(dest, '(', ')'),
            TokenKind::SquareBracketBlock => self.block_to_css(dest, '[', ']'),
            TokenKind::CurlyBracketBlock => self.block_to_css(dest, '{', '}'),
            TokenKind::Comma => dest.write_char(','),
        }
    }
}

impl Token {
    fn block_to_css<W: Write>(&self, dest: &mut W, open: char, close: char) -> fmt::Result {
        dest.write_char(open)?;
        if let Some(children) = &self.children {
            children.to_css(dest)?;
        }
        dest.write_char(close)
    }
}

impl ToCss for [Token] {
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        let mut previous: Option<&Token> = None;
        for token in self {
            if let Some(previous) = previous {
                if previous.whitespace.contains(Whitespace::AFTER) ||
                    token.whitespace.contains(Whitespace::BEFORE)
                {
                    dest.write_char(' ')?;
                }
            }
            token.to_css(dest)?;
            previous = Some(token);
        }
        Ok(())
    }
}

impl ToCss for Vec<Token> {
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        self[..].to_css(dest)
    }
}

/// Whether dropping the whitespace between `left` and `right` would fuse them
/// into a different token sequence when re-tokenized.
fn must_separate(left: &Token, right: &Token) -> bool {
    let sticky_left = matches!(
        left.kind,
        TokenKind::Ident | TokenKind::Number | TokenKind::Dimension | TokenKind::Hash
    );
    if !sticky_left {
        return false;
    }
    match right.kind {
        // `and (…)` must not become the function token `and(`.
        TokenKind::ParenthesisBlock | TokenKind::Function => left.kind == TokenKind::Ident,
        TokenKind::Ident | TokenKind::Number | TokenKind::Percentage | TokenKind::Dimension => true,
        _ => false,
    }
}

/// Clears whitespace bits throughout `tokens`, keeping a single separator
/// where removing it would change how the value re-tokenizes. The `+` and `-`
/// delimiters keep their whitespace: inside `calc()` it is significant.
pub fn minify_whitespace(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if !(tokens[i].is_delim('+') || tokens[i].is_delim('-')) {
            let keep_before = i > 0 &&
                (must_separate(&tokens[i - 1], &tokens[i]) ||
                    tokens[i - 1].is_delim('+') ||
                    tokens[i - 1].is_delim('-'));
            tokens[i].whitespace = if keep_before {
                Whitespace::BEFORE
            } else {
                Whitespace::empty()
            };
        }
        if let Some(children) = &mut tokens[i].children {
            minify_whitespace(children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_split() {
        let token = Token::dimension("12.5", "px");
        assert_eq!(token.dimension_value(), Some(12.5));
        assert_eq!(token.dimension_unit(), "px");
        assert_eq!(token.to_css_string(), "12.5px");
    }

    #[test]
    fn whitespace_kept_where_tokens_would_fuse() {
        let mut tokens = vec![
            Token::dimension("1", "px").with_whitespace(Whitespace::AFTER),
            Token::ident("solid").with_whitespace(Whitespace::BEFORE | Whitespace::AFTER),
            Token::hash("ff0000").with_whitespace(Whitespace::BEFORE),
        ];
        minify_whitespace(&mut tokens);
        assert_eq!(tokens.to_css_string(), "1px solid#ff0000");
    }
}
