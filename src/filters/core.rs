//! Core math utilities shared by the filters.
//!
//! This module provides:
//! - The Gaussian density used for both proximity and similarity weights
//! - Spatial distance between pixel coordinates
//! - Pixel similarity metrics (intensity, Euclidean RGB, perceptual L*ab)
//! - Quantization of filtered samples back to 8-bit
//!
//! All functions are pure and unguarded: a zero sigma produces inf/NaN
//! rather than an error. Parameter validation lives in [`super::params`].

use std::f64::consts::PI;

/// Gaussian density `g(x) = 1/(sigma·sqrt(2π)) · exp(-x²/(2·sigma²))`.
///
/// # Arguments
/// * `x` - Distance (spatial or intensity/colour)
/// * `sigma` - Standard deviation, must be non-zero
///
/// # Returns
/// Density value at `x`. Peak value `1/(sigma·sqrt(2π))` at `x = 0`.
#[inline]
pub fn gaussian(x: f64, sigma: f64) -> f64 {
    (1.0 / (sigma * (2.0 * PI).sqrt())) * (-(x * x) / (2.0 * sigma * sigma)).exp()
}

/// Euclidean distance between pixel coordinates `(x1, y1)` and `(x2, y2)`.
#[inline]
pub fn spatial_distance(x1: isize, y1: isize, x2: isize, y2: isize) -> f64 {
    let dx = (x1 - x2) as f64;
    let dy = (y1 - y2) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Absolute difference of two grayscale intensities.
///
/// Both intensities are truncated toward zero before differencing, so
/// `intensity_distance(100.0, 250.9) == 150.0`. This mirrors 8-bit
/// sample semantics and differs from a plain float `abs` difference.
#[inline]
pub fn intensity_distance(i1: f64, i2: f64) -> f64 {
    (i1.trunc() - i2.trunc()).abs()
}

/// Euclidean distance between two colour vectors.
#[inline]
pub fn rgb_distance(c1: &[f64; 3], c2: &[f64; 3]) -> f64 {
    let d0 = c1[0] - c2[0];
    let d1 = c1[1] - c2[1];
    let d2 = c1[2] - c2[2];
    (d0 * d0 + d1 * d1 + d2 * d2).sqrt()
}

/// Perceptual colour difference between two `[L, a, b]` vectors.
///
/// Splits the difference into lightness, chroma and hue terms and
/// weights chroma by `1 + 0.045·C1` and hue by `1 + 0.015·C1`, where
/// `C1` is the chroma of the first argument. Because only `C1` enters the
/// weights, the metric is not symmetric for colours of different chroma.
pub fn lab_distance(c1: &[f64; 3], c2: &[f64; 3]) -> f64 {
    let delta_l = c1[0] - c2[0];
    let delta_a = c1[1] - c2[1];
    let delta_b = c1[2] - c2[2];

    let chroma1 = c1[1].hypot(c1[2]);
    let chroma2 = c2[1].hypot(c2[2]);
    let delta_c = chroma1 - chroma2;

    let delta_h_sq = delta_a * delta_a + delta_b * delta_b - delta_c * delta_c;
    let delta_h = if delta_h_sq > 0.0 { delta_h_sq.sqrt() } else { 0.0 };

    let c_term = delta_c / (1.0 + 0.045 * chroma1);
    let h_term = delta_h / (1.0 + 0.015 * chroma1);

    (delta_l * delta_l + c_term * c_term + h_term * h_term).sqrt()
}

/// Round a filtered sample to the nearest 8-bit value, saturating at 0 and 255.
///
/// Exact halves round to the even neighbour (`100.5 -> 100`, `101.5 -> 102`).
#[inline]
pub fn quantize_u8(v: f64) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}
