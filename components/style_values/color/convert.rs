/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Color space conversions.
//!
//! The matrices and transfer functions below are the ones published in
//! CSS Color 4 (<https://drafts.csswg.org/css-color-4/#color-conversion-code>),
//! carried at full `f64` precision. Transfer functions are extended to
//! negative channels by reflection around the axis, so out-of-gamut values
//! survive a round trip. All functions are total; NaN propagates.

/// The D50 reference white, derived from the xy chromaticity (0.3457, 0.3585).
pub const D50_WHITE: [f64; 3] = [
    0.3457 / 0.3585,
    1.0,
    (1.0 - 0.3457 - 0.3585) / 0.3585,
];

#[inline]
fn multiply_matrix(m: &[f64; 9], [x, y, z]: [f64; 3]) -> [f64; 3] {
    [
        m[0] * x + m[1] * y + m[2] * z,
        m[3] * x + m[4] * y + m[5] * z,
        m[6] * x + m[7] * y + m[8] * z,
    ]
}

#[inline]
fn map3(v: [f64; 3], f: impl Fn(f64) -> f64) -> [f64; 3] {
    [f(v[0]), f(v[1]), f(v[2])]
}

/// Gamma-encoded sRGB to linear light.
pub fn lin_srgb(rgb: [f64; 3]) -> [f64; 3] {
    map3(rgb, |c| {
        let abs = c.abs();
        if abs < 0.04045 {
            c / 12.92
        } else {
            c.signum() * ((abs + 0.055) / 1.055).powf(2.4)
        }
    })
}

/// Linear-light sRGB to gamma-encoded form.
pub fn gam_srgb(rgb: [f64; 3]) -> [f64; 3] {
    map3(rgb, |c| {
        let abs = c.abs();
        if abs > 0.0031308 {
            c.signum() * (1.055 * abs.powf(1.0 / 2.4) - 0.055)
        } else {
            12.92 * c
        }
    })
}

/// Linear-light sRGB to XYZ (D65, sRGB's own white).
pub fn lin_srgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        0.41239079926595934,
        0.357584339383878,
        0.1804807884018343,
        0.21263900587151027,
        0.715168678767756,
        0.07219231536073371,
        0.01933081871559182,
        0.11919477979462598,
        0.9505321522496607,
    ];
    multiply_matrix(&MATRIX, rgb)
}

/// XYZ (D65) to linear-light sRGB.
pub fn xyz_to_lin_srgb(xyz: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        3.2409699419045226,
        -1.537383177570094,
        -0.4986107602930034,
        -0.9692436362808796,
        1.8759675015077202,
        0.04155505740717559,
        0.05563007969699366,
        -0.20397695888897652,
        1.0569715142428786,
    ];
    multiply_matrix(&MATRIX, xyz)
}

/// Gamma-encoded sRGB to XYZ (D65).
pub fn srgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    lin_srgb_to_xyz(lin_srgb(rgb))
}

/// XYZ (D65) to gamma-encoded sRGB.
pub fn xyz_to_srgb(xyz: [f64; 3]) -> [f64; 3] {
    gam_srgb(xyz_to_lin_srgb(xyz))
}

/// Gamma-encoded display-p3 to XYZ (D65). P3 shares the sRGB transfer curve.
pub fn p3_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        0.4865709486482162,
        0.26566769316909306,
        0.1982172852343625,
        0.2289745640697488,
        0.6917385218365064,
        0.079286914093745,
        0.0,
        0.04511338185890264,
        1.043944368900976,
    ];
    multiply_matrix(&MATRIX, lin_srgb(rgb))
}

/// XYZ (D65) to gamma-encoded display-p3.
pub fn xyz_to_p3(xyz: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        2.493496911941425,
        -0.9313836179191239,
        -0.40271078445071684,
        -0.8294889695615747,
        1.7626640603183463,
        0.023624685841943577,
        0.03584583024378447,
        -0.07617238926804182,
        0.9568845240076872,
    ];
    gam_srgb(multiply_matrix(&MATRIX, xyz))
}

/// Gamma-encoded a98-rgb to XYZ (D65). The transfer exponent is 563/256.
pub fn a98_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        0.5766690429101305,
        0.1855582379065463,
        0.1882286462349947,
        0.29734497525053605,
        0.6273635662554661,
        0.07529145849399788,
        0.02703136138641234,
        0.07068885253582723,
        0.9913375368376388,
    ];
    let lin = map3(rgb, |c| c.signum() * c.abs().powf(563.0 / 256.0));
    multiply_matrix(&MATRIX, lin)
}

/// XYZ (D65) to gamma-encoded a98-rgb.
pub fn xyz_to_a98(xyz: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        2.0415879038107465,
        -0.5650069742788596,
        -0.34473135077832956,
        -0.9692436362808795,
        1.8759675015077202,
        0.04155505740717557,
        0.013444280632031142,
        -0.11836239223101838,
        1.0151749943912054,
    ];
    map3(multiply_matrix(&MATRIX, xyz), |c| {
        c.signum() * c.abs().powf(256.0 / 563.0)
    })
}

/// Gamma-encoded prophoto-rgb to XYZ (D50, prophoto's native white).
/// The transfer curve is gamma 1.8 with a small linear toe.
pub fn prophoto_to_xyz_d50(rgb: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        0.7977604896723027,
        0.13518583717574031,
        0.0313493495815248,
        0.2880711282292934,
        0.7118432178101014,
        0.00008565396060525902,
        0.0,
        0.0,
        0.8251046025104601,
    ];
    let lin = map3(rgb, |c| {
        let abs = c.abs();
        if abs <= 16.0 / 512.0 {
            c / 16.0
        } else {
            c.signum() * abs.powf(1.8)
        }
    });
    multiply_matrix(&MATRIX, lin)
}

/// XYZ (D50) to gamma-encoded prophoto-rgb.
pub fn xyz_d50_to_prophoto(xyz: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        1.3457989731028281,
        -0.25558010007997534,
        -0.05110628506753401,
        -0.5446224939028347,
        1.5082327413132781,
        0.02053603239147973,
        0.0,
        0.0,
        1.2119675456389454,
    ];
    map3(multiply_matrix(&MATRIX, xyz), |c| {
        let abs = c.abs();
        if abs >= 1.0 / 512.0 {
            c.signum() * abs.powf(1.0 / 1.8)
        } else {
            16.0 * c
        }
    })
}

/// Gamma-encoded rec2020 to XYZ (D65), per ITU-R BT.2020-2.
pub fn rec2020_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    const ALPHA: f64 = 1.09929682680944;
    const BETA: f64 = 0.018053968510807;
    const MATRIX: [f64; 9] = [
        0.6369580483012914,
        0.14461690358620832,
        0.1688809751641721,
        0.2627002120112671,
        0.6779980715188708,
        0.05930171646986196,
        0.0,
        0.028072693049087428,
        1.060985057710791,
    ];
    let lin = map3(rgb, |c| {
        let abs = c.abs();
        if abs < BETA * 4.5 {
            c / 4.5
        } else {
            c.signum() * ((abs + ALPHA - 1.0) / ALPHA).powf(1.0 / 0.45)
        }
    });
    multiply_matrix(&MATRIX, lin)
}

/// XYZ (D65) to gamma-encoded rec2020.
pub fn xyz_to_rec2020(xyz: [f64; 3]) -> [f64; 3] {
    const ALPHA: f64 = 1.09929682680944;
    const BETA: f64 = 0.018053968510807;
    const MATRIX: [f64; 9] = [
        1.7166511879712674,
        -0.35567078377639233,
        -0.25336628137365974,
        -0.6666843518324892,
        1.6164812366349395,
        0.01576854581391113,
        0.017639857445310783,
        -0.042770613257808524,
        0.9421031212354738,
    ];
    map3(multiply_matrix(&MATRIX, xyz), |c| {
        let abs = c.abs();
        if abs > BETA {
            c.signum() * (ALPHA * abs.powf(0.45) - (ALPHA - 1.0))
        } else {
            4.5 * c
        }
    })
}

/// Bradford chromatic adaptation, D65 to D50.
pub fn d65_to_d50(xyz: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        1.0479298208405488,
        0.022946793341019088,
        -0.05019222954313557,
        0.029627815688159344,
        0.990434484573249,
        -0.01707382502938514,
        -0.009243058152591178,
        0.015055144896577895,
        0.7518742899580008,
    ];
    multiply_matrix(&MATRIX, xyz)
}

/// Bradford chromatic adaptation, D50 to D65.
pub fn d50_to_d65(xyz: [f64; 3]) -> [f64; 3] {
    const MATRIX: [f64; 9] = [
        0.9554734527042182,
        -0.023098536874261423,
        0.0632593086610217,
        -0.028369706963208136,
        1.0099954580058226,
        0.021041398966943008,
        0.012314001688319899,
        -0.020507696433477912,
        1.3303659366080753,
    ];
    multiply_matrix(&MATRIX, xyz)
}

// 6^3/29^3 and 29^3/3^3, the rational constants the CIE now defines.
const LAB_EPSILON: f64 = 216.0 / 24389.0;
const LAB_KAPPA: f64 = 24389.0 / 27.0;

/// CIE Lab to XYZ (D50).
pub fn lab_to_xyz_d50([l, a, b]: [f64; 3]) -> [f64; 3] {
    let f1 = (l + 16.0) / 116.0;
    let f0 = a / 500.0 + f1;
    let f2 = f1 - b / 200.0;

    let x = if f0.powi(3) > LAB_EPSILON {
        f0.powi(3)
    } else {
        (116.0 * f0 - 16.0) / LAB_KAPPA
    };
    let y = if l > LAB_KAPPA * LAB_EPSILON {
        f1.powi(3)
    } else {
        l / LAB_KAPPA
    };
    let z = if f2.powi(3) > LAB_EPSILON {
        f2.powi(3)
    } else {
        (116.0 * f2 - 16.0) / LAB_KAPPA
    };

    [x * D50_WHITE[0], y * D50_WHITE[1], z * D50_WHITE[2]]
}

/// XYZ (D50) to CIE Lab.
pub fn xyz_d50_to_lab([x, y, z]: [f64; 3]) -> [f64; 3] {
    let f = |v: f64| {
        if v > LAB_EPSILON {
            v.cbrt()
        } else {
            (LAB_KAPPA * v + 16.0) / 116.0
        }
    };
    let f0 = f(x / D50_WHITE[0]);
    let f1 = f(y / D50_WHITE[1]);
    let f2 = f(z / D50_WHITE[2]);

    [116.0 * f1 - 16.0, 500.0 * (f0 - f1), 200.0 * (f1 - f2)]
}

/// Rectangular to polar, shared by Lab→LCH and OKLab→OKLCH. The hue comes
/// out normalized to [0, 360).
pub fn lab_to_lch([l, a, b]: [f64; 3]) -> [f64; 3] {
    let hue = b.atan2(a).to_degrees();
    [
        l,
        (a * a + b * b).sqrt(),
        if hue >= 0.0 { hue } else { hue + 360.0 },
    ]
}

/// Polar to rectangular, shared by LCH→Lab and OKLCH→OKLab.
pub fn lch_to_lab([l, c, h]: [f64; 3]) -> [f64; 3] {
    let h = h.to_radians();
    [l, c * h.cos(), c * h.sin()]
}

/// OKLab to XYZ (D65), via cubed LMS.
pub fn oklab_to_xyz(lab: [f64; 3]) -> [f64; 3] {
    const OKLAB_TO_LMS: [f64; 9] = [
        0.99999999845051981432,
        0.39633779217376785678,
        0.21580375806075880339,
        1.0000000088817607767,
        -0.1055613423236563494,
        -0.063854174771705903402,
        1.0000000546724109177,
        -0.089484182094965759684,
        -1.2914855378640917399,
    ];
    const LMS_TO_XYZ: [f64; 9] = [
        1.2268798733741557,
        -0.5578149965554813,
        0.28139105017721583,
        -0.04057576262431372,
        1.1122868293970594,
        -0.07171106666151701,
        -0.07637294974672142,
        -0.4214933239627914,
        1.5869240244272418,
    ];
    let lms = multiply_matrix(&OKLAB_TO_LMS, lab);
    multiply_matrix(&LMS_TO_XYZ, map3(lms, |v| v.powi(3)))
}

/// XYZ (D65) to OKLab, via LMS cube roots.
pub fn xyz_to_oklab(xyz: [f64; 3]) -> [f64; 3] {
    const XYZ_TO_LMS: [f64; 9] = [
        0.8190224432164319,
        0.3619062562801221,
        -0.12887378261216414,
        0.0329836671980271,
        0.9292868468965546,
        0.03614466816999844,
        0.048177199566046255,
        0.26423952494422764,
        0.6335478258136937,
    ];
    const LMS_TO_OKLAB: [f64; 9] = [
        0.2104542553,
        0.7936177850,
        -0.0040720468,
        1.9779984951,
        -2.4285922050,
        0.4505937099,
        0.0259040371,
        0.7827717662,
        -0.8086757660,
    ];
    let lms = multiply_matrix(&XYZ_TO_LMS, xyz);
    multiply_matrix(&LMS_TO_OKLAB, map3(lms, f64::cbrt))
}

/// HSL to sRGB. Hue in degrees (any range), saturation and lightness in
/// [0, 1]. <https://drafts.csswg.org/css-color-4/#hsl-to-rgb>
pub fn hsl_to_rgb([hue, s, l]: [f64; 3]) -> [f64; 3] {
    let hue = hue.rem_euclid(360.0);
    let f = |n: f64| {
        let k = (n + hue / 30.0).rem_euclid(12.0);
        let a = s * l.min(1.0 - l);
        l - a * (k - 3.0).min(9.0 - k).min(1.0f64).max(-1.0)
    };
    [f(0.0), f(8.0), f(4.0)]
}

/// HWB to sRGB. Hue in degrees, whiteness and blackness in [0, 1].
/// <https://drafts.csswg.org/css-color-4/#hwb-to-rgb>
pub fn hwb_to_rgb([hue, w, b]: [f64; 3]) -> [f64; 3] {
    if w + b >= 1.0 {
        let gray = w / (w + b);
        return [gray, gray, gray];
    }
    map3(hsl_to_rgb([hue, 1.0, 0.5]), |c| c * (1.0 - w - b) + w)
}
