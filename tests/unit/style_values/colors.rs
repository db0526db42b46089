/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Color re-serialization, lowering and gamut mapping.

use style_values::{Settings, UnsupportedFeatures};

use crate::lexer::{minify, minify_with, unsupported};

#[test]
fn hex_shrinks_to_a_keyword_when_shorter() {
    assert_eq!(minify("color: #ff0000"), "color:red");
    assert_eq!(minify("color: #ffc0cb"), "color:pink");
}

#[test]
fn keywords_shrink_to_hex_when_shorter() {
    assert_eq!(minify("color: white"), "color:#fff");
    assert_eq!(minify("color: rebeccapurple"), "color:#639");
}

#[test]
fn six_digit_hex_compacts_when_digits_pair_up() {
    assert_eq!(minify("color: #aabbcc"), "color:#abc");
    assert_eq!(minify("color: #aabbcd"), "color:#aabbcd");
}

#[test]
fn equal_length_forms_keep_the_source() {
    // `blue` and `#00f` are the same length; rewriting is pure churn.
    assert_eq!(minify("color: blue"), "color:blue");
    assert_eq!(minify("color: #00f"), "color:#00f");
}

#[test]
fn translucent_colors_use_hex_alpha_when_supported() {
    assert_eq!(minify("color: rgba(1, 2, 3, 0.5)"), "color:#01020380");
    assert_eq!(minify("color: rgba(0, 0, 0, 0)"), "color:#0000");
}

#[test]
fn translucent_colors_fall_back_to_rgba_when_hex_alpha_is_not() {
    let settings = unsupported(UnsupportedFeatures::HEX_RGBA);
    assert_eq!(
        minify_with("color: rgba(1, 2, 3, 0.5)", &settings),
        "color:rgba(1,2,3,.5)"
    );
    assert_eq!(
        minify_with("color: #f00c", &settings),
        "color:rgba(255,0,0,.8)"
    );
    // Alpha fractions truncate; 1/255 is .00392…, not .004.
    assert_eq!(
        minify_with("color: #00000001", &settings),
        "color:rgba(0,0,0,.003)"
    );
    // Transparent black has a keyword shorter than any function form.
    assert_eq!(
        minify_with("color: rgba(0, 0, 0, 0)", &settings),
        "color:transparent"
    );
}

#[test]
fn legacy_function_syntax_resolves() {
    assert_eq!(minify("color: rgb(255, 0, 0)"), "color:red");
    assert_eq!(minify("color: hsl(0, 100%, 50%)"), "color:red");
}

#[test]
fn modern_syntax_is_lowered_only_when_unsupported() {
    let keep = Settings {
        minify_syntax: false,
        minify_whitespace: false,
        ..Settings::default()
    };
    assert_eq!(minify_with("color: rgb(1 2 3)", &keep), "color:rgb(1 2 3)");

    let lower = Settings {
        unsupported_features: UnsupportedFeatures::MODERN_RGB_HSL,
        minify_syntax: false,
        minify_whitespace: false,
        ..Settings::default()
    };
    assert_eq!(minify_with("color: rgb(1 2 3)", &lower), "color:#010203");
}

#[test]
fn hwb_resolves_to_srgb() {
    // Equal whiteness and blackness make an achromatic gray.
    assert_eq!(minify("color: hwb(0 50% 50%)"), "color:gray");
}

#[test]
fn color_function_folds_only_when_srgb_is_exact() {
    assert_eq!(minify("color: color(srgb 1 0 0)"), "color:red");
    // Out of the sRGB gamut: rewriting would shift the rendered color on
    // targets that understand the syntax.
    assert_eq!(
        minify("color: oklch(0.5 0.37 150)"),
        "color:oklch(0.5 0.37 150)"
    );
}

#[test]
fn unsupported_color_functions_are_gamut_mapped() {
    let settings = unsupported(UnsupportedFeatures::COLOR_FUNCTIONS);
    assert_eq!(minify_with("color: lab(100 0 0)", &settings), "color:#fff");
    // Display-P3 green has no exact sRGB form; mapping must still land on
    // some in-gamut hex color.
    let mapped = minify_with("color: color(display-p3 0 1 0)", &settings);
    assert!(mapped.starts_with("color:#"), "got {}", mapped);
}

#[test]
fn non_colors_pass_through() {
    assert_eq!(minify("color: currentcolor"), "color:currentcolor");
    assert_eq!(minify("color: var(--brand)"), "color:var(--brand)");
}
