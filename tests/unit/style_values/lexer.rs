/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A small value tokenizer for building test inputs.
//!
//! Production callers hand the crate tokens from a full CSS tokenizer; the
//! tests get by with enough of css-syntax to cover declaration values:
//! numerics with units, idents, functions, hex colors, strings, blocks,
//! commas and delimiters, with whitespace adjacency recorded on both
//! neighbors.

use smallvec::SmallVec;
use style_values::properties::{Declaration, PropertyKey};
use style_values::tokens::{SourceLocation, ToCss, Token, TokenKind, TokenList, Whitespace};
use style_values::{minify_declarations, Settings, UnsupportedFeatures};

struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_at(&self, nth: usize) -> Option<char> {
        self.input[self.position..].chars().nth(nth)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
        self.position != start
    }

    fn take_while(&mut self, test: fn(char) -> bool) -> String {
        let start = self.position;
        while self.peek().is_some_and(test) {
            self.bump();
        }
        self.input[start..self.position].to_owned()
    }

    /// Tokenizes until `closing` (or the end of input), consuming the
    /// closing code point.
    fn block(&mut self, closing: Option<char>) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        loop {
            let spaced = self.skip_whitespace();
            if spaced {
                if let Some(last) = tokens.last_mut() {
                    last.whitespace.insert(Whitespace::AFTER);
                }
            }
            match self.peek() {
                None => break,
                Some(c) if Some(c) == closing => {
                    self.bump();
                    break;
                },
                Some(_) => {},
            }
            let column = self.position as u32;
            let mut token = self.next_token();
            token.location = SourceLocation { line: 0, column };
            if spaced {
                token.whitespace.insert(Whitespace::BEFORE);
            }
            tokens.push(token);
        }
        tokens
    }

    fn starts_number(&self) -> bool {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_at(1).is_some_and(|c| c.is_ascii_digit()),
            Some('+' | '-') => match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('.') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            },
            _ => false,
        }
    }

    fn starts_ident(&self) -> bool {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => true,
            Some('-') => self
                .peek_at(1)
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '-' || c == '_'),
            _ => false,
        }
    }

    fn next_token(&mut self) -> Token {
        let c = self.peek().expect("next_token called at the end of input");
        if self.starts_number() {
            return self.numeric();
        }
        if self.starts_ident() {
            return self.ident_like();
        }
        match c {
            '#' => {
                self.bump();
                Token::hash(self.take_while(|c| c.is_ascii_alphanumeric()))
            },
            '"' | '\'' => self.quoted(c),
            '(' => {
                self.bump();
                Token::parenthesis_block(self.block(Some(')')))
            },
            ',' => {
                self.bump();
                Token::comma()
            },
            _ => {
                self.bump();
                Token::delim(c)
            },
        }
    }

    fn numeric(&mut self) -> Token {
        let start = self.position;
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let value = self.input[start..self.position].to_owned();
        if self.peek() == Some('%') {
            self.bump();
            return Token::percentage(value);
        }
        if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            let unit = self.take_while(|c| c.is_ascii_alphabetic());
            return Token::dimension(&value, &unit);
        }
        Token::number(value)
    }

    fn ident_like(&mut self) -> Token {
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if self.peek() == Some('(') {
            self.bump();
            Token::function(name, self.block(Some(')')))
        } else {
            Token::ident(name)
        }
    }

    /// No escapes; the tests never need them.
    fn quoted(&mut self, quote: char) -> Token {
        self.bump();
        let start = self.position;
        while self.peek().is_some_and(|c| c != quote) {
            self.bump();
        }
        let text = self.input[start..self.position].to_owned();
        self.bump();
        Token::new(TokenKind::QuotedString, text)
    }
}

pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer { input, position: 0 }.block(None)
}

pub fn parse_value(input: &str) -> TokenList {
    SmallVec::from_vec(tokenize(input))
}

pub fn parse_declaration(input: &str) -> Declaration {
    let (name, value) = input.split_once(':').expect("a declaration needs a colon");
    let mut value = parse_value(value.trim());
    let important = matches!(
        &value[..],
        [.., bang, ident]
            if bang.is_delim('!') &&
                ident.kind == TokenKind::Ident &&
                ident.text.eq_ignore_ascii_case("important")
    );
    if important {
        value.truncate(value.len() - 2);
        if let Some(last) = value.last_mut() {
            last.whitespace.remove(Whitespace::AFTER);
        }
    }
    Declaration {
        property: PropertyKey::from_name(name.trim()),
        value,
        important,
        location: SourceLocation::default(),
    }
}

/// Test inputs never carry `;` inside strings or blocks, so a plain split
/// is enough.
pub fn parse_declarations(input: &str) -> Vec<Declaration> {
    input
        .split(';')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(parse_declaration)
        .collect()
}

pub fn minify_with(input: &str, settings: &Settings) -> String {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut declarations = parse_declarations(input);
    minify_declarations(&mut declarations, settings);
    declarations
        .iter()
        .map(ToCss::to_css_string)
        .collect::<Vec<_>>()
        .join(";")
}

pub fn minify(input: &str) -> String {
    minify_with(input, &Settings::default())
}

pub fn unsupported(features: UnsupportedFeatures) -> Settings {
    Settings {
        unsupported_features: features,
        ..Settings::default()
    }
}

#[test]
fn tokenizer_conventions() {
    let tokens = tokenize("12.5px 50% #abc -4 .5turn");
    assert_eq!(tokens[0].dimension_value(), Some(12.5));
    assert_eq!(tokens[0].dimension_unit(), "px");
    assert_eq!(tokens[1].kind, TokenKind::Percentage);
    assert_eq!(tokens[1].text, "50");
    assert_eq!(tokens[2].kind, TokenKind::Hash);
    assert_eq!(tokens[2].text, "abc");
    assert_eq!(tokens[3].number_value(), Some(-4.0));
    assert_eq!(tokens[4].dimension_unit(), "turn");
}

#[test]
fn functions_nest() {
    let tokens = tokenize("calc(var(--x) + 1px)");
    assert!(tokens[0].is_function("calc"));
    let children = tokens[0].children.as_deref().unwrap();
    assert!(children[0].is_function("var"));
    assert!(children[1].is_delim('+'));
    assert!(children[1].whitespace.contains(Whitespace::BEFORE));
    assert!(children[1].whitespace.contains(Whitespace::AFTER));
}

#[test]
fn important_is_peeled_off_the_value() {
    let declaration = parse_declaration("margin-top: 1px !IMPORTANT");
    assert!(declaration.important);
    assert_eq!(declaration.value.len(), 1);
    assert_eq!(declaration.to_css_string(), "margin-top:1px !important");
}
