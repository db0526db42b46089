/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Merging of four-sided shorthands with their longhands.
//!
//! A tracker watches one family (`margin`, `padding` or `inset`) across a
//! rule body. Whenever all four sides are known and unit-compatible, the
//! declarations that contributed them collapse into a single shorthand at
//! the position of the last contributor.

use log::debug;
use smallvec::SmallVec;

use super::{Declaration, MutationLog, Property, PropertyKey};
use crate::tokens::{Token, TokenKind, TokenList, Whitespace};

/// One shorthand family: the shorthand property, its four longhands in
/// top/right/bottom/left order, and the keyword the sides may carry.
pub struct BoxSideConfig {
    /// The shorthand property.
    pub shorthand: Property,
    /// The longhand properties, in shorthand order.
    pub sides: [Property; 4],
    /// A keyword usable as a side value (`auto`), if any.
    pub allowed_ident: Option<&'static str>,
}

/// The `margin` family.
pub static MARGIN_SIDES: BoxSideConfig = BoxSideConfig {
    shorthand: Property::Margin,
    sides: [
        Property::MarginTop,
        Property::MarginRight,
        Property::MarginBottom,
        Property::MarginLeft,
    ],
    allowed_ident: Some("auto"),
};

/// The `padding` family.
pub static PADDING_SIDES: BoxSideConfig = BoxSideConfig {
    shorthand: Property::Padding,
    sides: [
        Property::PaddingTop,
        Property::PaddingRight,
        Property::PaddingBottom,
        Property::PaddingLeft,
    ],
    allowed_ident: None,
};

/// The `inset` family.
pub static INSET_SIDES: BoxSideConfig = BoxSideConfig {
    shorthand: Property::Inset,
    sides: [
        Property::Top,
        Property::Right,
        Property::Bottom,
        Property::Left,
    ],
    allowed_ident: Some("auto"),
};

/// Whether a unit keeps its meaning when a declaration moves or merges.
/// Viewport and container-relative units do not: `1vw` and `1vh` must never
/// collapse into one shorthand slot.
fn is_safe_length_unit(unit: &str) -> bool {
    matches!(
        &*unit.to_ascii_lowercase(),
        "cm" | "em" | "in" | "mm" | "pc" | "pt" | "px" | "q"
    )
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
enum UnitSafety {
    /// Zero, percentages, safe length units, allowed keywords.
    #[default]
    Safe,
    /// Exactly one unrecognized unit so far.
    Single(String),
    /// Anything beyond that; merging is off the table.
    Mixed,
}

/// Tracks which units a merge candidate has seen.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct UnitSafetyTracker {
    status: UnitSafety,
}

impl UnitSafetyTracker {
    pub(crate) fn include(&mut self, token: &Token) {
        match token.kind {
            TokenKind::Number if token.numeric_value() == Some(0.0) => return,
            TokenKind::Percentage => return,
            TokenKind::Dimension => {
                let unit = token.dimension_unit();
                if is_safe_length_unit(unit) {
                    return;
                }
                match &self.status {
                    UnitSafety::Safe => {
                        self.status = UnitSafety::Single(unit.to_ascii_lowercase());
                        return;
                    },
                    UnitSafety::Single(seen) if seen.eq_ignore_ascii_case(unit) => return,
                    _ => {},
                }
            },
            _ => {},
        }
        self.status = UnitSafety::Mixed;
    }

    pub(crate) fn is_safe(&self) -> bool {
        self.status == UnitSafety::Safe
    }

    /// Two candidates may merge when both saw the same single unit picture
    /// and neither saw a mix.
    pub(crate) fn compatible_with(&self, other: &Self) -> bool {
        self.status != UnitSafety::Mixed && self.status == other.status
    }
}

fn is_allowed_ident(token: &Token, allowed_ident: Option<&str>) -> bool {
    token.kind == TokenKind::Ident &&
        allowed_ident.is_some_and(|ident| token.text.eq_ignore_ascii_case(ident))
}

fn is_side_token(token: &Token, allowed_ident: Option<&str>) -> bool {
    token.kind.is_numeric() || is_allowed_ident(token, allowed_ident)
}

/// Expands 1..=4 side tokens to the full top/right/bottom/left quad.
pub(crate) fn expand_quad<'a>(
    tokens: &'a [Token],
    allowed_ident: Option<&str>,
) -> Option<[&'a Token; 4]> {
    if tokens.is_empty() ||
        tokens.len() > 4 ||
        !tokens.iter().all(|t| is_side_token(t, allowed_ident))
    {
        return None;
    }
    Some(match tokens {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        _ => [&tokens[0], &tokens[1], &tokens[2], &tokens[3]],
    })
}

/// Collapses a quad back to its shortest run: the left value may repeat the
/// right one, then the bottom the top, then the right the top.
pub(crate) fn compact_quad(quad: [&Token; 4]) -> TokenList {
    let eq = |a: &Token, b: &Token| a.eq_ignoring_whitespace(b);
    let mut len = 4;
    if eq(quad[3], quad[1]) {
        len = 3;
        if eq(quad[2], quad[0]) {
            len = 2;
            if eq(quad[1], quad[0]) {
                len = 1;
            }
        }
    }
    let mut value = SmallVec::new();
    for (i, token) in quad[..len].iter().enumerate() {
        let mut token = (*token).clone();
        token.whitespace = if i == 0 {
            Whitespace::empty()
        } else {
            Whitespace::BEFORE
        };
        value.push(token);
    }
    value
}

#[derive(Clone, Debug)]
struct Side {
    token: Token,
    declaration_index: usize,
    /// Whether a longhand declaration (as opposed to a shorthand slot)
    /// produced this entry.
    single_rule: bool,
    safety: UnitSafetyTracker,
}

/// The tracker for one four-sided family.
pub struct BoxSideTracker {
    config: &'static BoxSideConfig,
    sides: [Option<Side>; 4],
    important: bool,
}

impl BoxSideTracker {
    /// A fresh tracker for the given family.
    pub fn new(config: &'static BoxSideConfig) -> Self {
        Self {
            config,
            sides: [None, None, None, None],
            important: false,
        }
    }

    fn clear(&mut self) {
        self.sides = [None, None, None, None];
    }

    /// An `!important` flip invalidates everything seen so far: the two
    /// priority levels must not merge across each other.
    fn reset_for_importance(&mut self, important: bool) {
        if self.important != important {
            self.clear();
            self.important = important;
        }
    }

    /// Feeds one declaration through the tracker, appending any edits to
    /// `log`. Declarations outside the family are ignored.
    pub fn visit(&mut self, declaration: &Declaration, index: usize, log: &mut MutationLog) {
        let property = match declaration.property {
            PropertyKey::Known(property) => property,
            PropertyKey::Unknown(_) => return,
        };
        if property == self.config.shorthand {
            self.visit_shorthand(declaration, index, log);
        } else if let Some(side) = self.config.sides.iter().position(|&p| p == property) {
            self.visit_longhand(declaration, index, side, log);
        }
    }

    fn visit_shorthand(&mut self, declaration: &Declaration, index: usize, log: &mut MutationLog) {
        self.reset_for_importance(declaration.important);
        let Some(quad) = expand_quad(&declaration.value, self.config.allowed_ident) else {
            // A value we cannot read invalidates any pending merge.
            self.clear();
            return;
        };
        for (side, token) in quad.into_iter().enumerate() {
            let mut safety = UnitSafetyTracker::default();
            if !is_allowed_ident(token, self.config.allowed_ident) {
                safety.include(token);
            }
            self.update_side(
                side,
                Side {
                    token: token.clone(),
                    declaration_index: index,
                    single_rule: false,
                    safety,
                },
                log,
            );
        }
        self.compact(log);
    }

    fn visit_longhand(
        &mut self,
        declaration: &Declaration,
        index: usize,
        side: usize,
        log: &mut MutationLog,
    ) {
        self.reset_for_importance(declaration.important);
        let token = match &declaration.value[..] {
            [token] if is_side_token(token, self.config.allowed_ident) => token,
            _ => {
                self.clear();
                return;
            },
        };
        let mut safety = UnitSafetyTracker::default();
        if !is_allowed_ident(token, self.config.allowed_ident) {
            safety.include(token);
        }
        self.update_side(
            side,
            Side {
                token: token.clone(),
                declaration_index: index,
                single_rule: true,
                safety,
            },
            log,
        );
        self.compact(log);
    }

    fn update_side(&mut self, side: usize, new: Side, log: &mut MutationLog) {
        if let Some(old) = &self.sides[side] {
            // The superseded declaration can only go when dropping it is
            // provably safe: a shorthand must not disappear in favor of a
            // single overriding longhand, and unit tricks (a fallback like
            // `margin-top: 1q` after `margin-top: 1rem`) must survive.
            if (!new.single_rule || old.single_rule) && old.safety.is_safe() && new.safety.is_safe()
            {
                log.remove(old.declaration_index);
            }
        }
        self.sides[side] = Some(new);
    }

    fn compact(&mut self, log: &mut MutationLog) {
        let [Some(top), Some(right), Some(bottom), Some(left)] = &self.sides else {
            return;
        };
        let sides = [top, right, bottom, left];
        if !sides
            .iter()
            .all(|side| side.safety.compatible_with(&top.safety))
        {
            return;
        }

        let value = compact_quad([&top.token, &right.token, &bottom.token, &left.token]);
        let last = sides
            .iter()
            .map(|side| side.declaration_index)
            .max()
            .unwrap_or(0);
        for side in &sides {
            if side.declaration_index != last {
                log.remove(side.declaration_index);
            }
        }
        debug!(
            "merging {} sides into a {}-token shorthand",
            self.config.shorthand.name(),
            value.len()
        );
        log.replace(
            last,
            Declaration {
                property: PropertyKey::Known(self.config.shorthand),
                value,
                important: self.important,
                location: sides
                    .iter()
                    .find(|side| side.declaration_index == last)
                    .map_or_else(Default::default, |side| side.token.location),
            },
        );
    }
}
