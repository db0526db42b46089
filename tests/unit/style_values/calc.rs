/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! `calc()` folding through the declaration pipeline.

use crate::lexer::minify;

#[test]
fn products_and_sums_fold_to_one_length() {
    assert_eq!(minify("width: calc(2px * 3 + 4px * 5)"), "width:26px");
}

#[test]
fn matching_units_merge_around_an_opaque_operand() {
    assert_eq!(minify("width: calc(1px - x + 2px)"), "width:calc(3px - x)");
}

#[test]
fn percentages_fold_like_any_other_unit() {
    assert_eq!(minify("width: calc(100% - 20%)"), "width:80%");
}

#[test]
fn division_by_a_number_folds_into_the_unit() {
    assert_eq!(minify("width: calc(10px / 4)"), "width:2.5px");
}

#[test]
fn nested_calc_folds_innermost_first() {
    assert_eq!(minify("width: calc(calc(1px + 2px) * 2)"), "width:6px");
}

#[test]
fn pending_var_substitution_is_left_alone() {
    assert_eq!(
        minify("width: calc(var(--gutter) + 2px)"),
        "width:calc(var(--gutter) + 2px)"
    );
}

#[test]
fn unspaced_minus_is_a_sign_not_an_operator() {
    // `1px -2px` is two lengths; folding them would change the value.
    assert_eq!(minify("width: calc(1px -2px)"), "width:calc(1px -2px)");
}

#[test]
fn misplaced_operators_leave_the_expression_untouched() {
    assert_eq!(
        minify("width: calc(1px + + 2px)"),
        "width:calc(1px + + 2px)"
    );
}

#[test]
fn reciprocal_division_prints_shorter_than_its_factor() {
    assert_eq!(minify("width: calc(x / 3)"), "width:calc(x/3)");
    assert_eq!(minify("width: calc(x * 2 / 4)"), "width:calc(x/2)");
}

#[test]
fn unit_factors_vanish_from_a_product() {
    // Numeric factors that multiply out to 1 must not be printed back.
    assert_eq!(minify("width: calc(1 / e)"), "width:calc(1/e)");
    assert_eq!(minify("width: calc(2 * x / 2)"), "width:calc(x)");
}
