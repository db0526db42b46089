/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Merging of `border-radius` with its corner longhands.
//!
//! Like the box tracker, but each corner carries a horizontal and a vertical
//! radius and both axes compact independently: the slash half of the
//! shorthand only appears when the two compacted quads differ.
//! <https://drafts.csswg.org/css-backgrounds/#border-radius>

use log::debug;

use super::box_shorthand::{compact_quad, expand_quad, UnitSafetyTracker};
use super::{Declaration, MutationLog, Property, PropertyKey};
use crate::tokens::{slices_eq_ignoring_whitespace, Token, TokenList, Whitespace};

fn corner_of(property: Property) -> Option<usize> {
    Some(match property {
        Property::BorderTopLeftRadius => 0,
        Property::BorderTopRightRadius => 1,
        Property::BorderBottomRightRadius => 2,
        Property::BorderBottomLeftRadius => 3,
        _ => return None,
    })
}

#[derive(Clone, Debug)]
struct Corner {
    horizontal: Token,
    vertical: Token,
    declaration_index: usize,
    single_rule: bool,
    safety: [UnitSafetyTracker; 2],
}

impl Corner {
    fn is_safe(&self) -> bool {
        self.safety.iter().all(UnitSafetyTracker::is_safe)
    }
}

/// The tracker for the `border-radius` family.
#[derive(Default)]
pub struct BorderRadiusTracker {
    corners: [Option<Corner>; 4],
    important: bool,
}

impl BorderRadiusTracker {
    fn clear(&mut self) {
        self.corners = [None, None, None, None];
    }

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
        if property == Property::BorderRadius {
            self.visit_shorthand(declaration, index, log);
        } else if let Some(corner) = corner_of(property) {
            self.visit_longhand(declaration, index, corner, log);
        }
    }

    fn visit_shorthand(&mut self, declaration: &Declaration, index: usize, log: &mut MutationLog) {
        self.reset_for_importance(declaration.important);
        let value = &declaration.value;
        let slash = value.iter().position(|t| t.is_delim('/'));
        // Without a slash the vertical radii repeat the horizontal ones.
        let (horizontal, vertical) = match slash {
            Some(i) => (&value[..i], &value[i + 1..]),
            None => (&value[..], &value[..]),
        };
        let (Some(horizontal), Some(vertical)) =
            (expand_quad(horizontal, None), expand_quad(vertical, None))
        else {
            self.clear();
            return;
        };
        for corner in 0..4 {
            let mut safety = [UnitSafetyTracker::default(), UnitSafetyTracker::default()];
            safety[0].include(horizontal[corner]);
            safety[1].include(vertical[corner]);
            self.update_corner(
                corner,
                Corner {
                    horizontal: horizontal[corner].clone(),
                    vertical: vertical[corner].clone(),
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
        corner: usize,
        log: &mut MutationLog,
    ) {
        self.reset_for_importance(declaration.important);
        let (horizontal, vertical) = match &declaration.value[..] {
            [both] if both.kind.is_numeric() => (both, both),
            [h, v] if h.kind.is_numeric() && v.kind.is_numeric() => (h, v),
            _ => {
                self.clear();
                return;
            },
        };
        let mut safety = [UnitSafetyTracker::default(), UnitSafetyTracker::default()];
        safety[0].include(horizontal);
        safety[1].include(vertical);
        self.update_corner(
            corner,
            Corner {
                horizontal: horizontal.clone(),
                vertical: vertical.clone(),
                declaration_index: index,
                single_rule: true,
                safety,
            },
            log,
        );
        self.compact(log);
    }

    fn update_corner(&mut self, corner: usize, new: Corner, log: &mut MutationLog) {
        if let Some(old) = &self.corners[corner] {
            if (!new.single_rule || old.single_rule) && old.is_safe() && new.is_safe() {
                log.remove(old.declaration_index);
            }
        }
        self.corners[corner] = Some(new);
    }

    fn compact(&mut self, log: &mut MutationLog) {
        let [Some(tl), Some(tr), Some(br), Some(bl)] = &self.corners else {
            return;
        };
        let corners = [tl, tr, br, bl];
        for axis in 0..2 {
            if !corners
                .iter()
                .all(|corner| corner.safety[axis].compatible_with(&tl.safety[axis]))
            {
                return;
            }
        }

        let horizontal = compact_quad([
            &tl.horizontal,
            &tr.horizontal,
            &br.horizontal,
            &bl.horizontal,
        ]);
        let vertical = compact_quad([&tl.vertical, &tr.vertical, &br.vertical, &bl.vertical]);

        let mut value: TokenList = horizontal;
        if !slices_eq_ignoring_whitespace(&value, &vertical) {
            value.push(
                Token::delim('/').with_whitespace(Whitespace::BEFORE | Whitespace::AFTER),
            );
            value.extend(vertical);
        }

        let last = corners
            .iter()
            .map(|corner| corner.declaration_index)
            .max()
            .unwrap_or(0);
        for corner in &corners {
            if corner.declaration_index != last {
                log.remove(corner.declaration_index);
            }
        }
        debug!("merging border-radius corners into a shorthand");
        log.replace(
            last,
            Declaration {
                property: PropertyKey::Known(Property::BorderRadius),
                value,
                important: self.important,
                location: corners
                    .iter()
                    .find(|corner| corner.declaration_index == last)
                    .map_or_else(Default::default, |corner| corner.horizontal.location),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;
    use crate::tokens::SourceLocation;

    fn decl(property: Property, value: TokenList) -> Declaration {
        Declaration {
            property: PropertyKey::Known(property),
            value,
            important: false,
            location: SourceLocation::default(),
        }
    }

    #[test]
    fn slashless_shorthand_repeats_both_axes() {
        let mut tracker = BorderRadiusTracker::default();
        let mut log = MutationLog::default();
        let declaration = decl(
            Property::BorderRadius,
            smallvec![Token::dimension("1", "px")],
        );
        tracker.visit(&declaration, 0, &mut log);
        let corner = tracker.corners[2].as_ref().unwrap();
        assert!(corner.horizontal.eq_ignoring_whitespace(&corner.vertical));
    }
}
