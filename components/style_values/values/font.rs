/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Font weight keywords.
//! <https://drafts.csswg.org/css-fonts-4/#font-weight-prop>

use crate::tokens::{Token, TokenKind};

/// Whether this token can be the font size of the `font` shorthand: a
/// length, a percentage, or one of the size keywords.
/// <https://drafts.csswg.org/css-fonts-4/#font-size-prop>
fn is_font_size(token: &Token) -> bool {
    match token.kind {
        TokenKind::Dimension | TokenKind::Percentage => true,
        TokenKind::Ident => matches!(
            &*token.text.to_ascii_lowercase(),
            "xx-small" |
                "x-small" |
                "small" |
                "medium" |
                "large" |
                "x-large" |
                "xx-large" |
                "larger" |
                "smaller"
        ),
        _ => false,
    }
}

fn replace_keyword(token: &mut Token, weight: &str) {
    let mut replacement = Token::number(weight);
    replacement.whitespace = token.whitespace;
    replacement.location = token.location;
    *token = replacement;
}

/// `font-weight: normal | bold` folds to its numeric weight. The relative
/// keywords `bolder`/`lighter` have no numeric equivalent and stay.
pub fn minify_font_weight(tokens: &mut [Token]) {
    let [token] = tokens else { return };
    if token.kind != TokenKind::Ident {
        return;
    }
    if token.text.eq_ignore_ascii_case("normal") {
        replace_keyword(token, "400");
    } else if token.text.eq_ignore_ascii_case("bold") {
        replace_keyword(token, "700");
    }
}

/// In the `font` shorthand only `bold` is unambiguous: `normal` there can
/// belong to style, variant, weight or stretch, so it stays as written.
pub fn minify_font(tokens: &mut [Token]) {
    for token in tokens {
        // Everything from the font size on is line-height and family names;
        // an ident there may legitimately be called "bold".
        if is_font_size(token) {
            break;
        }
        if token.kind == TokenKind::Ident && token.text.eq_ignore_ascii_case("bold") {
            replace_keyword(token, "700");
        }
    }
}
