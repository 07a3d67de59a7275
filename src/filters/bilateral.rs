//! Bilateral filter engine.
//!
//! Each output pixel is a normalized weighted average over a square
//! `(2r+1) x (2r+1)` window, where the weight of a neighbour is the
//! product of
//! - a proximity Gaussian of its spatial distance to the centre, and
//! - a similarity Gaussian of its intensity/colour distance to the centre.
//!
//! The similarity metric is pluggable through [`ColorDistance`]; the engine
//! is written once for any [`Pixel`] type (scalar intensities and colour
//! vectors).
//!
//! ## Border Contract
//!
//! [`bilateral_filter`] only computes interior pixels
//! (`r <= x < H - r`, `r <= y < W - r`). The `r`-wide border of the output
//! is left at zero, so callers pad with [`super::boundary::replication`]
//! first and remove the padding afterwards. The pipelines in
//! [`super::pipeline`] do this for you.
//!
//! The engine performs no validation. Sigmas must be positive; a window
//! whose weights all underflow to zero yields NaN.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use rayon::prelude::*;
use tracing::trace;

use super::core::{gaussian, intensity_distance, lab_distance, rgb_distance, spatial_distance};
use super::params::BilateralParams;
use crate::error::{FilterError, FilterResult};

/// A value the bilateral engine can average.
///
/// `Default::default()` must be the additive zero.
pub trait Pixel: Copy + Default + Send + Sync {
    /// Return `acc + weight * self`.
    fn accumulate(self, acc: Self, weight: f64) -> Self;

    /// Return `self / denominator`.
    fn normalize(self, denominator: f64) -> Self;
}

impl Pixel for f64 {
    #[inline]
    fn accumulate(self, acc: Self, weight: f64) -> Self {
        acc + weight * self
    }

    #[inline]
    fn normalize(self, denominator: f64) -> Self {
        self / denominator
    }
}

impl Pixel for [f64; 3] {
    #[inline]
    fn accumulate(self, acc: Self, weight: f64) -> Self {
        [
            acc[0] + weight * self[0],
            acc[1] + weight * self[1],
            acc[2] + weight * self[2],
        ]
    }

    #[inline]
    fn normalize(self, denominator: f64) -> Self {
        [
            self[0] / denominator,
            self[1] / denominator,
            self[2] / denominator,
        ]
    }
}

/// Distance metric between two pixel values.
///
/// Any `Fn(&P, &P) -> f64` closure is also a `ColorDistance<P>`.
pub trait ColorDistance<P> {
    /// Non-negative distance between two pixel values.
    fn distance(&self, a: &P, b: &P) -> f64;
}

impl<P, F> ColorDistance<P> for F
where
    F: Fn(&P, &P) -> f64,
{
    #[inline]
    fn distance(&self, a: &P, b: &P) -> f64 {
        self(a, b)
    }
}

/// Truncated absolute intensity difference, see [`intensity_distance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntensityDistance;

impl ColorDistance<f64> for IntensityDistance {
    #[inline]
    fn distance(&self, a: &f64, b: &f64) -> f64 {
        intensity_distance(*a, *b)
    }
}

/// Euclidean distance between colour vectors, see [`rgb_distance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbDistance;

impl ColorDistance<[f64; 3]> for RgbDistance {
    #[inline]
    fn distance(&self, a: &[f64; 3], b: &[f64; 3]) -> f64 {
        rgb_distance(a, b)
    }
}

/// Perceptual distance between `[L, a, b]` vectors, see [`lab_distance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LabDistance;

impl ColorDistance<[f64; 3]> for LabDistance {
    #[inline]
    fn distance(&self, a: &[f64; 3], b: &[f64; 3]) -> f64 {
        lab_distance(a, b)
    }
}

/// Per-call bilateral kernel.
///
/// Built once per filtering call and evaluated per pixel. Holds the source
/// view, the parameters and a lookup table of proximity weights for every
/// window offset; it has no mutable state, so it can be shared across
/// worker threads.
pub struct BilateralKernel<'a, 'd, P, C: ?Sized> {
    image: ArrayView2<'a, P>,
    radius: usize,
    sigma_intensity: f64,
    /// Row-major `(2r+1)^2` proximity weights.
    proximity: Vec<f64>,
    distance: &'d C,
}

impl<'a, 'd, P, C> BilateralKernel<'a, 'd, P, C>
where
    P: Pixel,
    C: ColorDistance<P> + ?Sized,
{
    pub fn new(image: ArrayView2<'a, P>, params: &BilateralParams, distance: &'d C) -> Self {
        let r = params.radius as isize;
        let proximity = (-r..=r)
            .flat_map(|di| {
                (-r..=r).map(move |dj| gaussian(spatial_distance(0, 0, di, dj), params.sigma_proximity))
            })
            .collect();

        Self {
            image,
            radius: params.radius,
            sigma_intensity: params.sigma_intensity,
            proximity,
            distance,
        }
    }

    /// Filtered value of the pixel at row `x`, column `y`.
    ///
    /// # Panics
    /// If the window around `(x, y)` does not lie entirely inside the image.
    pub fn apply_at(&self, x: usize, y: usize) -> P {
        let r = self.radius;
        let side = 2 * r + 1;
        let center = self.image[[x, y]];

        let mut numerator = P::default();
        let mut denominator = 0.0;

        for (wi, i) in (x - r..=x + r).enumerate() {
            for (wj, j) in (y - r..=y + r).enumerate() {
                let neighbor = self.image[[i, j]];
                let g_i = gaussian(self.distance.distance(&center, &neighbor), self.sigma_intensity);
                let g_p = self.proximity[wi * side + wj];
                let weight = g_i * g_p;

                numerator = neighbor.accumulate(numerator, weight);
                denominator += weight;
            }
        }

        debug_assert!(denominator > 0.0, "all bilateral weights underflowed at ({x}, {y})");
        numerator.normalize(denominator)
    }
}

/// Bilateral-filter the interior of an image.
///
/// # Arguments
/// * `image` - Source pixels, shape `(height, width)`
/// * `params` - Radius and both sigmas (not validated here)
/// * `distance` - Similarity metric between pixel values
///
/// # Returns
/// New array of the same shape. Pixels within `radius` of the border are
/// zero; if the image has no interior pixels the whole output is zero.
pub fn bilateral_filter<P, C>(image: ArrayView2<P>, params: &BilateralParams, distance: &C) -> Array2<P>
where
    P: Pixel,
    C: ColorDistance<P> + Sync + ?Sized,
{
    let (height, width) = image.dim();
    let r = params.radius;
    trace!(
        height,
        width,
        radius = r,
        sigma_proximity = params.sigma_proximity,
        sigma_intensity = params.sigma_intensity,
        "bilateral_filter"
    );

    let mut output = vec![P::default(); height * width];
    if width > 0 {
        let kernel = BilateralKernel::new(image, params, distance);
        output
            .par_chunks_mut(width)
            .enumerate()
            .filter(|(x, _)| *x >= r && *x + r < height)
            .for_each(|(x, row)| {
                for y in r..width.saturating_sub(r) {
                    row[y] = kernel.apply_at(x, y);
                }
            });
    }

    Array2::from_shape_vec((height, width), output).expect("Shape mismatch in bilateral_filter")
}

/// View an `(H, W, 3)` array as an `(H, W)` array of colour vectors.
pub fn pixels_from_channels(image: ArrayView3<f64>) -> FilterResult<Array2<[f64; 3]>> {
    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(FilterError::InvalidDimensions(format!(
            "expected 3 channels, got {channels}"
        )));
    }
    Ok(Array2::from_shape_fn((height, width), |(y, x)| {
        [image[[y, x, 0]], image[[y, x, 1]], image[[y, x, 2]]]
    }))
}

/// Inverse of [`pixels_from_channels`].
pub fn channels_from_pixels(pixels: ArrayView2<[f64; 3]>) -> Array3<f64> {
    let (height, width) = pixels.dim();
    Array3::from_shape_fn((height, width, 3), |(y, x, c)| pixels[[y, x]][c])
}
