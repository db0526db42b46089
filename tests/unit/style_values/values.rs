/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Shape normalization of `box-shadow`, gradients, transforms and fonts,
//! plus the whitespace pass.

use style_values::{Settings, UnsupportedFeatures};

use crate::lexer::{minify, minify_with, unsupported};

#[test]
fn box_shadow_drops_trailing_zero_lengths() {
    assert_eq!(minify("box-shadow: 1px 2px 0 0 red"), "box-shadow:1px 2px red");
    // The blur radius must stay while a spread follows it.
    assert_eq!(
        minify("box-shadow: 1px 2px 0 3px red"),
        "box-shadow:1px 2px 0 3px red"
    );
}

#[test]
fn box_shadow_colors_minify() {
    assert_eq!(
        minify("box-shadow: inset 0 0 5px #ff0000"),
        "box-shadow:inset 0 0 5px red"
    );
}

#[test]
fn box_shadow_handles_each_shadow_of_a_list() {
    assert_eq!(
        minify("box-shadow: 0 0 1px 0 #aabbcc, 0 0 0 0 #ffffff"),
        "box-shadow:0 0 1px#abc,0 0#fff"
    );
}

#[test]
fn unrecognized_shadow_shapes_pass_through() {
    assert_eq!(
        minify("box-shadow: 1px 2px 0 0 red blue"),
        "box-shadow:1px 2px 0 0 red blue"
    );
}

#[test]
fn adjacent_equal_color_stops_merge() {
    assert_eq!(
        minify("background-image: linear-gradient(red 10%, red 20%, blue)"),
        "background-image:linear-gradient(red 10%20%,blue)"
    );
}

#[test]
fn double_position_stops_split_for_older_targets() {
    assert_eq!(
        minify_with(
            "background-image: linear-gradient(#ff0000 10% 20%, blue)",
            &unsupported(UnsupportedFeatures::GRADIENT_DOUBLE_POSITION)
        ),
        "background-image:linear-gradient(red 10%,red 20%,blue)"
    );
}

#[test]
fn gradient_configuration_arguments_stay() {
    assert_eq!(
        minify("background: linear-gradient(45deg, #008000, #aabbcc)"),
        "background:linear-gradient(45deg,green,#abc)"
    );
}

#[test]
fn repeating_gradients_are_recognized() {
    assert_eq!(
        minify("background-image: repeating-linear-gradient(#ff0000, #ffc0cb)"),
        "background-image:repeating-linear-gradient(red,pink)"
    );
}

#[test]
fn identity_matrices_fold_to_scales() {
    assert_eq!(minify("transform: matrix(2, 0, 0, 2, 0, 0)"), "transform:scale(2)");
    assert_eq!(minify("transform: matrix(2, 0, 0, 1, 0, 0)"), "transform:scaleX(2)");
}

#[test]
fn zero_translations_fold_away() {
    assert_eq!(minify("transform: translate(10px, 0)"), "transform:translate(10px)");
    assert_eq!(minify("transform: translate(0, 10px)"), "transform:translateY(10px)");
    assert_eq!(minify("transform: translate3d(0, 0, 5px)"), "transform:translateZ(5px)");
}

#[test]
fn unit_scales_fold_away() {
    assert_eq!(minify("transform: scale(3, 3)"), "transform:scale(3)");
    assert_eq!(minify("transform: scale(1, 3)"), "transform:scaleY(3)");
    assert_eq!(minify("transform: scale3d(1, 1, 2)"), "transform:scaleZ(2)");
}

#[test]
fn rotate_z_is_plain_rotate() {
    assert_eq!(minify("transform: rotateZ(45deg)"), "transform:rotate(45deg)");
}

#[test]
fn transform_lists_only_lose_separating_whitespace() {
    assert_eq!(
        minify("transform: rotate(45deg) translateX(5px)"),
        "transform:rotate(45deg)translateX(5px)"
    );
}

#[test]
fn font_weight_keywords_get_numeric() {
    assert_eq!(minify("font-weight: bold"), "font-weight:700");
    assert_eq!(minify("font-weight: normal"), "font-weight:400");
    // Relative weights have no numeric equivalent.
    assert_eq!(minify("font-weight: bolder"), "font-weight:bolder");
}

#[test]
fn font_shorthand_only_rewrites_before_the_size() {
    assert_eq!(minify("font: bold 12px serif"), "font:700 12px serif");
    // A family may be named "bold"; past the size nothing is touched. The
    // size can also be a percentage or a keyword.
    assert_eq!(minify("font: 12px bold"), "font:12px bold");
    assert_eq!(minify("font: 100% bold"), "font:100%bold");
    assert_eq!(minify("font: small bold"), "font:small bold");
}

#[test]
fn whitespace_survives_only_where_tokens_would_fuse() {
    assert_eq!(minify("border: 1px   solid  #ff0000"), "border:1px solid#ff0000");
}

#[test]
fn whitespace_minification_can_be_disabled() {
    let settings = Settings {
        minify_whitespace: false,
        ..Settings::default()
    };
    assert_eq!(
        minify_with("margin: 1px   2px", &settings),
        "margin:1px 2px"
    );
}
