/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Value-level CSS transformations.
//!
//! This crate rewrites the declarations of one rule body at a time:
//! colors re-serialize in their shortest supported form (gamut-mapping
//! wide-gamut syntax for targets that lack it), `calc()` expressions fold,
//! `box-shadow`, gradient stop lists, transform functions and font weights
//! normalize, and four-sided shorthands merge with their longhands.
//!
//! Tokenization and rule-level parsing happen upstream; everything here
//! operates on the [`tokens::Token`] tree of a declaration value. The
//! entry point is [`minify_declarations`].
//!
//! None of the passes validate: a value the transform does not fully
//! understand is left exactly as written.

#![deny(unsafe_code)]
#![deny(missing_docs)]

use bitflags::bitflags;

pub mod color;
pub mod properties;
pub mod tokens;
pub mod values;

pub use properties::minify_declarations;

bitflags! {
    /// Syntax the target browsers do not understand. Values relying on an
    /// unsupported feature are lowered even when syntax minification is
    /// off.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct UnsupportedFeatures: u8 {
        /// `#rrggbbaa` / `#rgba` hex colors with alpha.
        const HEX_RGBA = 1 << 0;
        /// Space-separated `rgb()` / `hsl()` (and `hwb()`).
        const MODERN_RGB_HSL = 1 << 1;
        /// `lab()`, `lch()`, `oklab()`, `oklch()` and `color()`.
        const COLOR_FUNCTIONS = 1 << 2;
        /// Double-position gradient color stops.
        const GRADIENT_DOUBLE_POSITION = 1 << 3;
    }
}

/// What the transforms are allowed and required to do.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Features the output must avoid.
    pub unsupported_features: UnsupportedFeatures,
    /// Whether to rewrite values into shorter equivalent syntax.
    pub minify_syntax: bool,
    /// Whether to strip whitespace that separates tokens only visually.
    pub minify_whitespace: bool,
}

impl Default for Settings {
    /// Full minification for targets that understand everything.
    fn default() -> Self {
        Self {
            unsupported_features: UnsupportedFeatures::empty(),
            minify_syntax: true,
            minify_whitespace: true,
        }
    }
}
