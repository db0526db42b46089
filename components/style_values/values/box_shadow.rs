/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! `box-shadow` lists.
//! <https://drafts.csswg.org/css-backgrounds/#box-shadow>

use crate::color;
use crate::tokens::{Token, TokenKind, TokenList};
use crate::Settings;

/// Rewrites a `box-shadow` value: per comma-separated shadow, drops trailing
/// zero lengths (a shadow keeps at least its two offsets) and minifies the
/// shadow color. A shadow the analysis does not fully understand stays as
/// written.
pub fn minify_box_shadow(tokens: &mut TokenList, settings: &Settings) {
    let mut out = TokenList::with_capacity(tokens.len());
    let mut shadow: Vec<Token> = Vec::new();
    for token in tokens.drain(..) {
        if token.kind == TokenKind::Comma {
            minify_single_shadow(&mut shadow, settings);
            out.extend(shadow.drain(..));
            out.push(token);
        } else {
            shadow.push(token);
        }
    }
    minify_single_shadow(&mut shadow, settings);
    out.extend(shadow);
    *tokens = out;
}

fn minify_single_shadow(tokens: &mut Vec<Token>, settings: &Settings) {
    let mut lengths_start = None;
    let mut lengths = 0usize;
    let mut insets = 0usize;
    let mut colors = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        if matches!(token.kind, TokenKind::Number | TokenKind::Dimension) {
            match lengths_start {
                None => lengths_start = Some(i),
                // A second numeric run means we misread the shape.
                Some(start) if start + lengths != i => return,
                Some(_) => {},
            }
            lengths += 1;
        } else if token.kind == TokenKind::Ident && token.text.eq_ignore_ascii_case("inset") {
            insets += 1;
        } else if color::parse_color(token).is_some() ||
            (token.kind == TokenKind::Ident && token.text.eq_ignore_ascii_case("currentcolor"))
        {
            colors += 1;
        } else {
            return;
        }
    }

    let Some(start) = lengths_start else { return };
    if !(2..=4).contains(&lengths) || insets > 1 || colors > 1 {
        return;
    }

    if settings.minify_syntax {
        while lengths > 2 && tokens[start + lengths - 1].is_zero_length() {
            tokens.remove(start + lengths - 1);
            lengths -= 1;
        }
    }

    for token in tokens {
        color::minify_color_token(token, settings);
    }
}
