/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Transform function folding.
//! <https://drafts.csswg.org/css-transforms-2/#transform-functions>
//!
//! Only exact zero/one arguments trigger a fold, so floating point never
//! changes what the function computes, only how it is written.

use crate::tokens::{Token, TokenKind, Whitespace};

/// Rewrites each transform function in the value into an equivalent shorter
/// one where the arguments allow it.
pub fn minify_transform(tokens: &mut [Token]) {
    for token in tokens {
        if token.kind == TokenKind::Function {
            fold_function(token);
        }
    }
}

/// The single-token arguments of a comma-separated argument list.
fn single_token_arguments(children: &[Token]) -> Option<Vec<&Token>> {
    let mut arguments = Vec::new();
    let mut expect_comma = false;
    for token in children {
        if expect_comma != (token.kind == TokenKind::Comma) {
            return None;
        }
        if !expect_comma {
            arguments.push(token);
        }
        expect_comma = !expect_comma;
    }
    if expect_comma { Some(arguments) } else { None }
}

fn is_zero(token: &Token) -> bool {
    token.kind.is_numeric() && token.numeric_value() == Some(0.0)
}

fn is_one(token: &Token) -> bool {
    token.kind == TokenKind::Number && token.number_value() == Some(1.0)
}

fn numbers_equal(a: &Token, b: &Token) -> bool {
    a.kind == TokenKind::Number &&
        b.kind == TokenKind::Number &&
        a.number_value().is_some() &&
        a.number_value() == b.number_value()
}

fn rebuild(token: &mut Token, name: &str, arguments: &[&Token]) {
    let mut children = Vec::with_capacity(arguments.len() * 2);
    for (i, argument) in arguments.iter().enumerate() {
        if i > 0 {
            children.push(Token::comma());
        }
        let mut argument = (*argument).clone();
        argument.whitespace = Whitespace::empty();
        children.push(argument);
    }
    token.text = name.to_owned();
    token.children = Some(children);
}

fn fold_function(token: &mut Token) {
    let Some(children) = token.children.as_deref() else {
        return;
    };
    let arguments: Vec<Token> = match single_token_arguments(children) {
        Some(arguments) => arguments.into_iter().cloned().collect(),
        None => return,
    };
    let name = token.text.to_ascii_lowercase();
    match (name.as_str(), arguments.as_slice()) {
        ("matrix", [a, b, c, d, e, f]) => {
            if arguments.iter().all(|t| t.kind == TokenKind::Number) &&
                is_zero(b) &&
                is_zero(c) &&
                is_zero(e) &&
                is_zero(f)
            {
                if numbers_equal(a, d) {
                    rebuild(token, "scale", &[a]);
                } else if is_one(d) {
                    rebuild(token, "scaleX", &[a]);
                } else if is_one(a) {
                    rebuild(token, "scaleY", &[d]);
                } else {
                    rebuild(token, "scale", &[a, d]);
                }
            }
        },
        ("translate", [x, y]) => {
            if is_zero(y) {
                rebuild(token, "translate", &[x]);
            } else if is_zero(x) {
                rebuild(token, "translateY", &[y]);
            }
        },
        ("translate3d", [x, y, z]) => {
            if is_zero(x) && is_zero(y) {
                rebuild(token, "translateZ", &[z]);
            }
        },
        ("scale", [x, y]) => {
            if numbers_equal(x, y) {
                rebuild(token, "scale", &[x]);
            } else if is_one(y) {
                rebuild(token, "scaleX", &[x]);
            } else if is_one(x) {
                rebuild(token, "scaleY", &[y]);
            }
        },
        ("scale3d", [x, y, z]) => {
            if is_one(x) && is_one(y) {
                rebuild(token, "scaleZ", &[z]);
            }
        },
        ("rotatez", [angle]) => {
            rebuild(token, "rotate", &[angle]);
        },
        _ => {},
    }
}
