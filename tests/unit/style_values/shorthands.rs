/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Merging of four-sided families and `border-radius` across a rule body.

use style_values::Settings;

use crate::lexer::{minify, minify_with};

#[test]
fn margin_longhands_merge_into_the_shorthand() {
    assert_eq!(
        minify("margin-top: 3px; margin-right: 2px; margin-bottom: 4px; margin-left: 1px"),
        "margin:3px 2px 4px 1px"
    );
}

#[test]
fn longhand_refines_an_earlier_shorthand() {
    assert_eq!(
        minify("margin: 1px; margin-top: 5px"),
        "margin:5px 1px 1px"
    );
}

#[test]
fn repeated_sides_compact() {
    assert_eq!(
        minify("padding-top: 1px; padding-right: 2px; padding-bottom: 1px; padding-left: 2px"),
        "padding:1px 2px"
    );
}

#[test]
fn auto_counts_as_a_margin_side() {
    assert_eq!(
        minify("margin-top: auto; margin-right: 0; margin-bottom: auto; margin-left: 0"),
        "margin:auto 0"
    );
}

#[test]
fn padding_rejects_auto() {
    assert_eq!(
        minify("padding-top: auto; padding-right: auto; padding-bottom: auto; padding-left: auto"),
        "padding-top:auto;padding-right:auto;padding-bottom:auto;padding-left:auto"
    );
}

#[test]
fn viewport_units_never_merge() {
    assert_eq!(
        minify("margin-top: 1vw; margin-right: 1vh; margin-bottom: 1vw; margin-left: 1vh"),
        "margin-top:1vw;margin-right:1vh;margin-bottom:1vw;margin-left:1vh"
    );
}

#[test]
fn one_shared_exotic_unit_still_merges() {
    assert_eq!(
        minify("top: 1vmin; right: 1vmin; bottom: 1vmin; left: 1vmin"),
        "inset:1vmin"
    );
}

#[test]
fn zero_mixes_with_safe_units() {
    // `0` has no unit, so it merges with any of the always-safe units,
    // matched case-insensitively.
    assert_eq!(
        minify("top: 1Q; right: 2Q; bottom: 3Q; left: 0"),
        "inset:1Q 2Q 3Q 0"
    );
}

#[test]
fn overridden_longhand_is_dropped() {
    assert_eq!(minify("margin-top: 1px; margin-top: 2px"), "margin-top:2px");
}

#[test]
fn unit_fallback_overrides_are_kept() {
    // `q` support differs across targets; the first declaration is the
    // fallback and must survive.
    assert_eq!(
        minify("margin-top: 1rem; margin-top: 1q"),
        "margin-top:1rem;margin-top:1q"
    );
}

#[test]
fn importance_flip_blocks_merging() {
    assert_eq!(
        minify("margin-top: 1px !important; margin-right: 2px; margin-bottom: 3px; margin-left: 4px"),
        "margin-top:1px !important;margin-right:2px;margin-bottom:3px;margin-left:4px"
    );
}

#[test]
fn uniformly_important_sides_merge_important() {
    assert_eq!(
        minify(
            "margin-top: 1px !important; margin-right: 1px !important; \
             margin-bottom: 1px !important; margin-left: 1px !important"
        ),
        "margin:1px !important"
    );
}

#[test]
fn unrelated_declarations_keep_their_place() {
    assert_eq!(
        minify("margin-top: 1px; border: 0; margin-right: 1px; margin-bottom: 1px; margin-left: 1px"),
        "border:0;margin:1px"
    );
}

#[test]
fn merging_requires_minify_syntax() {
    let settings = Settings {
        minify_syntax: false,
        ..Settings::default()
    };
    assert_eq!(
        minify_with(
            "margin-top: 3px; margin-right: 2px; margin-bottom: 4px; margin-left: 1px",
            &settings
        ),
        "margin-top:3px;margin-right:2px;margin-bottom:4px;margin-left:1px"
    );
}

#[test]
fn radius_longhands_merge_into_the_shorthand() {
    assert_eq!(
        minify(
            "border-top-left-radius: 1px; border-top-right-radius: 2px; \
             border-bottom-right-radius: 1px; border-bottom-left-radius: 2px"
        ),
        "border-radius:1px 2px"
    );
}

#[test]
fn radius_axes_compact_independently() {
    assert_eq!(
        minify("border-radius: 0 / 1px 2px; border-top-left-radius: 3px"),
        "border-radius:3px 0 0/3px 2px 1px"
    );
}

#[test]
fn equal_axes_drop_the_slash() {
    assert_eq!(
        minify(
            "border-top-left-radius: 1px 2px; border-top-right-radius: 1px 2px; \
             border-bottom-right-radius: 1px 2px; border-bottom-left-radius: 1px 2px"
        ),
        "border-radius:1px/2px"
    );
}

#[test]
fn unreadable_radius_values_stop_the_tracker() {
    assert_eq!(
        minify("border-radius: var(--r); border-top-left-radius: 1px"),
        "border-radius:var(--r);border-top-left-radius:1px"
    );
}
