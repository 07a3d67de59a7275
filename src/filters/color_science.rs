//! Colour space conversion between sRGB and CIE L*ab.
//!
//! ## Channel Order
//!
//! Colour images in this crate store channels as **[B, G, R]**, the order
//! conventional image loaders produce. [`rgb2lab`] consumes and [`lab2rgb`]
//! produces `[B, G, R]` triples despite the "rgb" in their names. Passing
//! an `[R, G, B]` triple silently swaps the red and blue contributions.
//!
//! ## Value Ranges
//!
//! - sRGB: each channel 0.0-255.0
//! - L*ab: L in 0.0-100.0, a and b unbounded (typically ±128)
//!
//! The forward and inverse matrices are the usual 4-6 digit published
//! approximations, so a round trip is exact only to within a fraction of a
//! code value.

use ndarray::{Array2, ArrayView2};

// D65 reference white
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

/// Threshold between the cube-root and linear segments of the L*ab curve.
const LAB_EPSILON: f64 = 0.008856;
const LAB_KAPPA: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// sRGB gamma: v > 0.04045 uses the power segment.
#[inline]
fn srgb_to_linear(v: f64) -> f64 {
    if v > 0.04045 {
        ((v + 0.055) / 1.055).powf(2.4)
    } else {
        v / 12.92
    }
}

#[inline]
fn linear_to_srgb(v: f64) -> f64 {
    if v > 0.0031308 {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * v
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA * t + LAB_OFFSET
    }
}

#[inline]
fn lab_f_inv(f: f64) -> f64 {
    let cubed = f * f * f;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        (f - LAB_OFFSET) / LAB_KAPPA
    }
}

/// Convert a `[B, G, R]` pixel (0-255 per channel) to `[L, a, b]`.
pub fn rgb2lab(bgr: [f64; 3]) -> [f64; 3] {
    let b = srgb_to_linear(bgr[0] / 255.0);
    let g = srgb_to_linear(bgr[1] / 255.0);
    let r = srgb_to_linear(bgr[2] / 255.0);

    let x = (0.412453 * r + 0.357580 * g + 0.180423 * b) / WHITE_X;
    let y = (0.212671 * r + 0.715160 * g + 0.072169 * b) / WHITE_Y;
    let z = (0.019334 * r + 0.119193 * g + 0.950227 * b) / WHITE_Z;

    let fx = lab_f(x);
    let fy = lab_f(y);
    let fz = lab_f(z);

    let l = if y > LAB_EPSILON {
        116.0 * fy - 16.0
    } else {
        903.3 * y
    };

    [l, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Convert an `[L, a, b]` pixel back to `[B, G, R]` (0-255 per channel).
///
/// Out-of-gamut results are clamped to 0-255 per channel.
pub fn lab2rgb(lab: [f64; 3]) -> [f64; 3] {
    let fy = (lab[0] + 16.0) / 116.0;
    let fx = lab[1] / 500.0 + fy;
    let fz = fy - lab[2] / 200.0;

    let x = WHITE_X * lab_f_inv(fx);
    let y = WHITE_Y * lab_f_inv(fy);
    let z = WHITE_Z * lab_f_inv(fz);

    let r = x * 3.2406 + y * -1.5372 + z * -0.4986;
    let g = x * -0.9689 + y * 1.8758 + z * 0.0415;
    let b = x * 0.0557 + y * -0.2040 + z * 1.0570;

    let encode = |v: f64| linear_to_srgb(v).clamp(0.0, 1.0) * 255.0;

    [encode(b), encode(g), encode(r)]
}

/// Convert every pixel of a `[B, G, R]` image to `[L, a, b]`.
pub fn bgr_image_to_lab(image: ArrayView2<[f64; 3]>) -> Array2<[f64; 3]> {
    image.mapv(rgb2lab)
}

/// Convert every pixel of an `[L, a, b]` image to `[B, G, R]`.
pub fn lab_image_to_bgr(image: ArrayView2<[f64; 3]>) -> Array2<[f64; 3]> {
    image.mapv(lab2rgb)
}
