/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Gradient color stop lists.
//! <https://drafts.csswg.org/css-images-4/#color-stop-syntax>

use crate::color;
use crate::tokens::{Token, TokenKind, Whitespace};
use crate::{Settings, UnsupportedFeatures};

fn is_gradient(token: &Token) -> bool {
    let Some(name) = token.function_name() else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    let name = name.strip_prefix("repeating-").unwrap_or(&name);
    matches!(name, "linear-gradient" | "radial-gradient" | "conic-gradient")
}

/// Rewrites gradient stop lists among `tokens`: stop colors are minified,
/// double-position stops are split in two for targets that predate the
/// syntax, and adjacent single-position stops of equal color merge into one
/// double-position stop where the target allows it.
pub fn minify_gradients(tokens: &mut [Token], settings: &Settings) {
    for token in tokens {
        if !is_gradient(token) {
            continue;
        }
        if let Some(children) = token.children.take() {
            token.children = Some(rewrite_arguments(children, settings));
        }
    }
}

/// A comma-separated gradient argument: a color stop when a color leads the
/// group, otherwise configuration or an interpolation hint, left alone.
struct Argument {
    tokens: Vec<Token>,
    is_color_stop: bool,
}

fn rewrite_arguments(children: Vec<Token>, settings: &Settings) -> Vec<Token> {
    let mut arguments: Vec<Argument> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    for token in children {
        if token.kind == TokenKind::Comma {
            arguments.push(finish_argument(current, settings));
            current = Vec::new();
        } else {
            current.push(token);
        }
    }
    arguments.push(finish_argument(current, settings));

    let lower = settings
        .unsupported_features
        .contains(UnsupportedFeatures::GRADIENT_DOUBLE_POSITION);
    if lower {
        let mut split = Vec::with_capacity(arguments.len());
        for argument in arguments {
            if argument.is_color_stop && argument.tokens.len() == 3 {
                let [color, first, second] = match <[Token; 3]>::try_from(argument.tokens) {
                    Ok(parts) => parts,
                    Err(tokens) => {
                        split.push(Argument { tokens, is_color_stop: true });
                        continue;
                    },
                };
                split.push(Argument {
                    tokens: vec![color.clone(), first],
                    is_color_stop: true,
                });
                split.push(Argument {
                    tokens: vec![color, second],
                    is_color_stop: true,
                });
            } else {
                split.push(argument);
            }
        }
        arguments = split;
    } else if settings.minify_syntax {
        // Fuse `red 10%, red 20%` into `red 10% 20%`.
        let mut merged: Vec<Argument> = Vec::with_capacity(arguments.len());
        for argument in arguments {
            if let Some(previous) = merged.last_mut() {
                if previous.is_color_stop &&
                    argument.is_color_stop &&
                    previous.tokens.len() == 2 &&
                    argument.tokens.len() == 2 &&
                    previous.tokens[0].eq_ignoring_whitespace(&argument.tokens[0])
                {
                    if let Some(mut position) = argument.tokens.into_iter().nth(1) {
                        position.whitespace = Whitespace::BEFORE;
                        previous.tokens.push(position);
                    }
                    continue;
                }
            }
            merged.push(argument);
        }
        arguments = merged;
    }

    let mut out = Vec::new();
    for (i, argument) in arguments.into_iter().enumerate() {
        if i > 0 {
            out.push(Token::comma());
        }
        let mut tokens = argument.tokens;
        if i > 0 {
            if let Some(first) = tokens.first_mut() {
                first.whitespace.insert(Whitespace::BEFORE);
            }
        }
        out.extend(tokens);
    }
    out
}

fn finish_argument(mut tokens: Vec<Token>, settings: &Settings) -> Argument {
    let is_color_stop = match tokens.split_first_mut() {
        Some((first, rest)) => {
            let leads_with_color = color::parse_color(first).is_some();
            if leads_with_color {
                color::minify_color_token(first, settings);
            }
            leads_with_color && rest.len() <= 2 && rest.iter().all(|t| t.kind.is_numeric())
        },
        None => false,
    };
    Argument { tokens, is_color_stop }
}
