/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Gamut mapping.
//! <https://drafts.csswg.org/css-color-4/#gamut-mapping>

use super::convert;

// Just noticeable difference between two colors, measured as deltaE OK.
const JND: f64 = 0.02;
const EPSILON: f64 = 0.0001;

fn in_gamut(rgb: &[f64; 3]) -> bool {
    rgb.iter().all(|&c| (0.0..=1.0).contains(&c))
}

fn clip(rgb: &[f64; 3]) -> [f64; 3] {
    [
        rgb[0].clamp(0.0, 1.0),
        rgb[1].clamp(0.0, 1.0),
        rgb[2].clamp(0.0, 1.0),
    ]
}

/// deltaE OK, the Euclidean distance in OKLab.
/// <https://drafts.csswg.org/css-color-4/#color-difference-OK>
fn delta_eok(reference: &[f64; 3], oklab: &[f64; 3]) -> f64 {
    let sample = convert::xyz_to_oklab(convert::srgb_to_xyz(*reference));
    let dl = sample[0] - oklab[0];
    let da = sample[1] - oklab[1];
    let db = sample[2] - oklab[2];
    (dl * dl + da * da + db * db).sqrt()
}

fn oklch_to_srgb(oklch: [f64; 3]) -> [f64; 3] {
    convert::xyz_to_srgb(convert::oklab_to_xyz(convert::lch_to_lab(oklch)))
}

/// Maps an XYZ (D65) color into sRGB limits by the CSS Color 4 binary
/// search: reduce OKLCH chroma until the clipped color is within a just
/// noticeable difference of the reduced one.
///
/// Every return path yields clipped channels, including plain interval
/// convergence: the result feeds straight into byte packing, which needs
/// each channel inside `0..=1`.
/// <https://drafts.csswg.org/css-color-4/#binsearch>
pub fn map_to_srgb_gamut(xyz: [f64; 3]) -> [f64; 3] {
    let oklch = convert::lab_to_lch(convert::xyz_to_oklab(xyz));

    if oklch[0] >= 1.0 {
        return [1.0, 1.0, 1.0];
    }
    if oklch[0] <= 0.0 {
        return [0.0, 0.0, 0.0];
    }

    let mut current = convert::xyz_to_srgb(xyz);
    if in_gamut(&current) {
        return current;
    }

    let mut min = 0.0;
    let mut max = oklch[1];

    // The iteration cap guards against non-finite channels stalling the
    // interval; well-formed inputs converge long before it.
    for _ in 0..100 {
        if max - min <= EPSILON {
            break;
        }
        let chroma = (min + max) / 2.0;
        let reduced = [oklch[0], chroma, oklch[2]];
        current = oklch_to_srgb(reduced);
        if in_gamut(&current) {
            min = chroma;
            continue;
        }
        let clipped = clip(&current);
        if delta_eok(&clipped, &convert::lch_to_lab(reduced)) < JND {
            return clipped;
        }
        max = chroma;
    }

    clip(&current)
}
