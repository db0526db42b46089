/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Parsing and re-serialization of CSS color values.
//!
//! Colors that resolve to 8-bit sRGB are carried as packed `0xRRGGBBAA`;
//! the CSS Color 4 syntaxes (`lab()`, `lch()`, `oklab()`, `oklch()`,
//! `color()`) are carried as XYZ (D65) so no precision is lost deciding how
//! to serialize them. Serialization picks the shortest form the target
//! supports; when a color cannot be expressed faithfully in a supported
//! syntax, the original token is left alone.

use lazy_static::lazy_static;
use log::debug;

use crate::tokens::{contains_var, ToCss, Token, TokenKind};
use crate::{Settings, UnsupportedFeatures};

pub mod convert;
pub mod gamut;
pub mod named;

/// A parsed color value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParsedColor {
    /// An 8-bit sRGB color, packed `0xRRGGBBAA`.
    Rgba(u32),
    /// A color defined in a wider space, held as XYZ with a D65 white point.
    Xyz {
        /// The X component.
        x: f64,
        /// The Y component.
        y: f64,
        /// The Z component.
        z: f64,
        /// The alpha channel, in [0, 1].
        alpha: f64,
    },
}

impl ParsedColor {
    fn from_srgb(rgb: [f64; 3], alpha: f64) -> Self {
        ParsedColor::Rgba(pack_rgba(
            unit_to_byte(rgb[0]),
            unit_to_byte(rgb[1]),
            unit_to_byte(rgb[2]),
            unit_to_byte(alpha),
        ))
    }
}

#[inline]
fn pack_rgba(r: u32, g: u32, b: u32, a: u32) -> u32 {
    (r << 24) | (g << 16) | (b << 8) | a
}

/// Rounds a [0, 1] channel to a byte, clamping out-of-range input.
#[inline]
fn unit_to_byte(c: f64) -> u32 {
    let c = (c * 255.0).round();
    if c >= 255.0 {
        255
    } else if c >= 0.0 {
        c as u32
    } else {
        0
    }
}

/// Parses one token as a color. On success also reports which target
/// features the source syntax relies on, so callers can decide whether a
/// rewrite is a minification or a required lowering.
pub fn parse_color(token: &Token) -> Option<(ParsedColor, UnsupportedFeatures)> {
    match token.kind {
        TokenKind::Hash => {
            let hex = parse_hex(&token.text)?;
            let uses = if matches!(token.text.len(), 4 | 8) {
                UnsupportedFeatures::HEX_RGBA
            } else {
                UnsupportedFeatures::empty()
            };
            Some((ParsedColor::Rgba(hex), uses))
        },
        TokenKind::Ident => named::named_color(&token.text)
            .map(|hex| (ParsedColor::Rgba(hex), UnsupportedFeatures::empty())),
        TokenKind::Function => {
            let children = token.children.as_deref()?;
            if children.iter().any(contains_var) {
                return None;
            }
            let name = token.text.to_ascii_lowercase();
            match &*name {
                "rgb" | "rgba" => parse_rgb(children),
                "hsl" | "hsla" => parse_hsl(children),
                "hwb" => parse_hwb(children),
                "lab" => parse_lab_like(children, 125.0, |c| {
                    convert::d50_to_d65(convert::lab_to_xyz_d50(c))
                }),
                "oklab" => parse_lab_like(children, 0.4, convert::oklab_to_xyz),
                "lch" => parse_lch_like(children, 100.0, 150.0, |c| {
                    convert::d50_to_d65(convert::lab_to_xyz_d50(convert::lch_to_lab(c)))
                }),
                "oklch" => parse_lch_like(children, 1.0, 0.4, |c| {
                    convert::oklab_to_xyz(convert::lch_to_lab(c))
                }),
                "color" => parse_color_function(children),
                _ => None,
            }
        },
        _ => None,
    }
}

/// Parses the contents of a hash token as a 3/4/6/8 digit hex color into
/// `0xRRGGBBAA`.
pub fn parse_hex(text: &str) -> Option<u32> {
    if !matches!(text.len(), 3 | 4 | 6 | 8) {
        return None;
    }
    let mut digits = [0u32; 8];
    for (i, b) in text.bytes().enumerate() {
        digits[i] = (b as char).to_digit(16)?;
    }
    let d = &digits;
    Some(match text.len() {
        3 => pack_rgba(d[0] * 17, d[1] * 17, d[2] * 17, 255),
        4 => pack_rgba(d[0] * 17, d[1] * 17, d[2] * 17, d[3] * 17),
        6 => pack_rgba(d[0] << 4 | d[1], d[2] << 4 | d[3], d[4] << 4 | d[5], 255),
        8 => pack_rgba(
            d[0] << 4 | d[1],
            d[2] << 4 | d[3],
            d[4] << 4 | d[5],
            d[6] << 4 | d[7],
        ),
        _ => return None,
    })
}

/// The three main components, the optional alpha component, and whether the
/// comma-separated legacy syntax was used.
fn split_args(children: &[Token], allow_legacy: bool) -> Option<([&Token; 3], Option<&Token>, bool)> {
    let is_comma = |t: &Token| t.kind == TokenKind::Comma;
    if children.iter().any(|t| is_comma(t)) {
        if !allow_legacy {
            return None;
        }
        return match children {
            [a, c1, b, c2, c] if is_comma(c1) && is_comma(c2) => Some(([a, b, c], None, true)),
            [a, c1, b, c2, c, c3, alpha]
                if is_comma(c1) && is_comma(c2) && is_comma(c3) =>
            {
                Some(([a, b, c], Some(alpha), true))
            },
            _ => None,
        };
    }
    match children {
        [a, b, c] => Some(([a, b, c], None, false)),
        [a, b, c, slash, alpha] if slash.is_delim('/') => Some(([a, b, c], Some(alpha), false)),
        _ => None,
    }
}

/// A number, or a percentage scaled so that 100% maps to `percent_reference`.
fn number_or_percentage(token: &Token, percent_reference: f64) -> Option<f64> {
    match token.kind {
        TokenKind::Number => token.number_value(),
        TokenKind::Percentage => Some(token.percentage_value()? * percent_reference / 100.0),
        _ => None,
    }
}

/// An alpha component, clamped to [0, 1].
fn parse_alpha(token: Option<&Token>) -> Option<f64> {
    match token {
        None => Some(1.0),
        Some(token) => Some(number_or_percentage(token, 1.0)?.clamp(0.0, 1.0)),
    }
}

/// A hue in degrees: `deg`, `grad`, `rad`, `turn`, or a unitless number.
/// <https://drafts.csswg.org/css-values-4/#angles>
fn parse_hue(token: &Token) -> Option<f64> {
    match token.kind {
        TokenKind::Number => token.number_value(),
        TokenKind::Dimension => {
            let v = token.dimension_value()?;
            match &*token.dimension_unit().to_ascii_lowercase() {
                "deg" => Some(v),
                "grad" => Some(v * 360.0 / 400.0),
                "rad" => Some(v.to_degrees()),
                "turn" => Some(v * 360.0),
                _ => None,
            }
        },
        _ => None,
    }
}

fn parse_rgb(children: &[Token]) -> Option<(ParsedColor, UnsupportedFeatures)> {
    let (components, alpha, legacy) = split_args(children, true)?;
    let mut bytes = [0u32; 3];
    for (byte, token) in bytes.iter_mut().zip(components) {
        *byte = unit_to_byte(number_or_percentage(token, 255.0)? / 255.0);
    }
    let alpha = unit_to_byte(parse_alpha(alpha)?);
    let uses = if legacy {
        UnsupportedFeatures::empty()
    } else {
        UnsupportedFeatures::MODERN_RGB_HSL
    };
    Some((
        ParsedColor::Rgba(pack_rgba(bytes[0], bytes[1], bytes[2], alpha)),
        uses,
    ))
}

fn parse_hsl(children: &[Token]) -> Option<(ParsedColor, UnsupportedFeatures)> {
    let ([h, s, l], alpha, legacy) = split_args(children, true)?;
    let hue = parse_hue(h)?;
    let s = number_or_percentage(s, 100.0)?.clamp(0.0, 100.0) / 100.0;
    let l = number_or_percentage(l, 100.0)?.clamp(0.0, 100.0) / 100.0;
    let alpha = parse_alpha(alpha)?;
    let uses = if legacy {
        UnsupportedFeatures::empty()
    } else {
        UnsupportedFeatures::MODERN_RGB_HSL
    };
    Some((
        ParsedColor::from_srgb(convert::hsl_to_rgb([hue, s, l]), alpha),
        uses,
    ))
}

fn parse_hwb(children: &[Token]) -> Option<(ParsedColor, UnsupportedFeatures)> {
    let ([h, w, b], alpha, _) = split_args(children, false)?;
    let hue = parse_hue(h)?;
    let w = number_or_percentage(w, 100.0)?.clamp(0.0, 100.0) / 100.0;
    let b = number_or_percentage(b, 100.0)?.clamp(0.0, 100.0) / 100.0;
    let alpha = parse_alpha(alpha)?;
    Some((
        ParsedColor::from_srgb(convert::hwb_to_rgb([hue, w, b]), alpha),
        UnsupportedFeatures::MODERN_RGB_HSL,
    ))
}

/// `lab()` / `oklab()`. Lightness clamps at zero from below; a and b are
/// unbounded, with percentages scaled to `ab_reference`.
fn parse_lab_like(
    children: &[Token],
    ab_reference: f64,
    to_xyz: fn([f64; 3]) -> [f64; 3],
) -> Option<(ParsedColor, UnsupportedFeatures)> {
    let ([l, a, b], alpha, _) = split_args(children, false)?;
    let lightness_reference = if ab_reference > 1.0 { 100.0 } else { 1.0 };
    let l = number_or_percentage(l, lightness_reference)?.max(0.0);
    let a = number_or_percentage(a, ab_reference)?;
    let b = number_or_percentage(b, ab_reference)?;
    let alpha = parse_alpha(alpha)?;
    let [x, y, z] = to_xyz([l, a, b]);
    Some((
        ParsedColor::Xyz { x, y, z, alpha },
        UnsupportedFeatures::COLOR_FUNCTIONS,
    ))
}

/// `lch()` / `oklch()`. Chroma clamps at zero from below, with percentages
/// scaled to `chroma_reference`; hue is an angle.
fn parse_lch_like(
    children: &[Token],
    lightness_reference: f64,
    chroma_reference: f64,
    to_xyz: fn([f64; 3]) -> [f64; 3],
) -> Option<(ParsedColor, UnsupportedFeatures)> {
    let ([l, c, h], alpha, _) = split_args(children, false)?;
    let l = number_or_percentage(l, lightness_reference)?.max(0.0);
    let c = number_or_percentage(c, chroma_reference)?.max(0.0);
    let h = parse_hue(h)?;
    let alpha = parse_alpha(alpha)?;
    let [x, y, z] = to_xyz([l, c, h]);
    Some((
        ParsedColor::Xyz { x, y, z, alpha },
        UnsupportedFeatures::COLOR_FUNCTIONS,
    ))
}

/// `color()` with the predefined spaces of CSS Color 4 §10.
/// <https://drafts.csswg.org/css-color-4/#color-function>
fn parse_color_function(children: &[Token]) -> Option<(ParsedColor, UnsupportedFeatures)> {
    let (space, rest) = children.split_first()?;
    if space.kind != TokenKind::Ident {
        return None;
    }
    let ([a, b, c], alpha, _) = split_args(rest, false)?;
    let components = [
        number_or_percentage(a, 1.0)?,
        number_or_percentage(b, 1.0)?,
        number_or_percentage(c, 1.0)?,
    ];
    let alpha = parse_alpha(alpha)?;
    let [x, y, z] = match &*space.text.to_ascii_lowercase() {
        "srgb" => convert::srgb_to_xyz(components),
        "srgb-linear" => convert::lin_srgb_to_xyz(components),
        "display-p3" => convert::p3_to_xyz(components),
        "a98-rgb" => convert::a98_to_xyz(components),
        "prophoto-rgb" => convert::d50_to_d65(convert::prophoto_to_xyz_d50(components)),
        "rec2020" => convert::rec2020_to_xyz(components),
        "xyz" | "xyz-d65" => components,
        "xyz-d50" => convert::d50_to_d65(components),
        _ => return None,
    };
    Some((
        ParsedColor::Xyz { x, y, z, alpha },
        UnsupportedFeatures::COLOR_FUNCTIONS,
    ))
}

lazy_static! {
    /// `i/255` for every byte, truncated to at most three decimals (two when
    /// two round-trip), with no leading zero.
    static ref ALPHA_FRACTIONS: [String; 256] = std::array::from_fn(|i| {
        if i == 255 {
            return "1".to_owned();
        }
        let exact = i as f64 / 255.0;
        let mut truncated = (exact * 100.0).floor() / 100.0;
        if (truncated * 255.0).round() as usize != i {
            truncated = (exact * 1000.0).floor() / 1000.0;
        }
        let s = truncated.to_string();
        match s.strip_prefix("0.") {
            Some(fraction) => format!(".{}", fraction),
            None => s,
        }
    });
}

fn hex_digit(byte: u32) -> Option<u32> {
    // 0x11 multiples collapse to a single digit.
    if byte % 17 == 0 {
        Some(byte / 17)
    } else {
        None
    }
}

/// The shortest token for a packed `0xRRGGBBAA` color: a color keyword,
/// `#rgb`, `#rrggbb`, or with translucency `#rgba`/`#rrggbbaa` when the
/// target understands hex alpha and an `rgba()` fallback when it does not.
fn rgba_to_token(hex: u32, unsupported: UnsupportedFeatures) -> Token {
    let (r, g, b, a) = (hex >> 24, hex >> 16 & 0xff, hex >> 8 & 0xff, hex & 0xff);
    if a == 255 {
        let rgb = hex >> 8;
        if let Some(name) = named::short_color_name(rgb) {
            return Token::ident(name);
        }
        return match (hex_digit(r), hex_digit(g), hex_digit(b)) {
            (Some(r), Some(g), Some(b)) => Token::hash(format!("{:03x}", r << 8 | g << 4 | b)),
            _ => Token::hash(format!("{:06x}", rgb)),
        };
    }
    if !unsupported.contains(UnsupportedFeatures::HEX_RGBA) {
        return match (hex_digit(r), hex_digit(g), hex_digit(b), hex_digit(a)) {
            (Some(r), Some(g), Some(b), Some(a)) => {
                Token::hash(format!("{:04x}", r << 12 | g << 8 | b << 4 | a))
            },
            _ => Token::hash(format!("{:08x}", hex)),
        };
    }
    // Transparent black has a keyword shorter than any function form.
    // <https://www.w3.org/TR/css-color-4/#transparent-black>
    if hex == 0 {
        return Token::ident("transparent");
    }
    let mut buffer = itoa::Buffer::new();
    let mut children = Vec::with_capacity(7);
    for byte in [r, g, b] {
        children.push(Token::number(buffer.format(byte)));
        children.push(Token::comma());
    }
    children.push(Token::number(&*ALPHA_FRACTIONS[a as usize]));
    Token::function("rgba", children)
}

/// How far a converted channel may sit from its byte before the conversion
/// counts as lossy.
const BYTE_SLACK: f64 = 0.5 / 255.0;

fn xyz_to_exact_rgba(x: f64, y: f64, z: f64, alpha: f64) -> Option<u32> {
    let rgb = convert::xyz_to_srgb([x, y, z]);
    if !rgb
        .iter()
        .all(|&c| (-BYTE_SLACK..=1.0 + BYTE_SLACK).contains(&c))
    {
        return None;
    }
    Some(pack_rgba(
        unit_to_byte(rgb[0]),
        unit_to_byte(rgb[1]),
        unit_to_byte(rgb[2]),
        unit_to_byte(alpha),
    ))
}

/// Serializes a parsed color as the shortest supported token, or `None` when
/// the color is better left in its source syntax.
pub fn serialize_color(color: &ParsedColor, unsupported: UnsupportedFeatures) -> Option<Token> {
    let hex = match *color {
        ParsedColor::Rgba(hex) => hex,
        ParsedColor::Xyz { x, y, z, alpha } => {
            if unsupported.contains(UnsupportedFeatures::COLOR_FUNCTIONS) {
                let rgb = gamut::map_to_srgb_gamut([x, y, z]);
                debug!("gamut-mapping unsupported color syntax into sRGB");
                pack_rgba(
                    unit_to_byte(rgb[0]),
                    unit_to_byte(rgb[1]),
                    unit_to_byte(rgb[2]),
                    unit_to_byte(alpha),
                )
            } else {
                // The syntax is supported; only fold colors sRGB represents
                // exactly, anything else would visibly shift.
                xyz_to_exact_rgba(x, y, z, alpha)?
            }
        },
    };
    Some(rgba_to_token(hex, unsupported))
}

/// Rewrites any color among `tokens` into its shortest supported form.
/// Without `minify_syntax` only colors whose syntax the target does not
/// understand are rewritten.
pub fn minify_color_tokens(tokens: &mut [Token], settings: &Settings) {
    for token in tokens {
        minify_color_token(token, settings);
    }
}

/// Rewrites one color token in place; returns whether it changed.
pub fn minify_color_token(token: &mut Token, settings: &Settings) -> bool {
    let Some((color, uses)) = parse_color(token) else {
        return false;
    };
    let must_lower = settings.unsupported_features.intersects(uses);
    if !settings.minify_syntax && !must_lower {
        return false;
    }
    let Some(mut replacement) = serialize_color(&color, settings.unsupported_features) else {
        return false;
    };
    // `blue` and `#00f` tie; only a required lowering may produce a form
    // that is not strictly shorter than the source.
    if !must_lower && replacement.to_css_string().len() >= token.to_css_string().len() {
        return false;
    }
    replacement.whitespace = token.whitespace;
    replacement.location = token.location;
    *token = replacement;
    true
}
