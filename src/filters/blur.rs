//! Fixed-kernel Gaussian blur for grayscale images.
//!
//! Weights are `gaussian(spatial_distance, sigma)` over a square
//! `(2r+1) x (2r+1)` window, normalized by their sum. This is the bilateral
//! filter with the similarity term removed, so it shares the engine's
//! shape contract: [`gaussian_blur`] only writes interior pixels and
//! leaves an `r`-wide zero border, while [`gaussian_blur_padded`] pads
//! first and returns every pixel.

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use tracing::{debug, trace};

use super::boundary::{removal, replication};
use super::core::{gaussian, quantize_u8, spatial_distance};
use super::params::{check_not_empty, check_sigma};
use crate::error::FilterResult;

/// Normalized `(2r+1)^2` Gaussian kernel, row-major.
fn gaussian_kernel_2d(radius: usize, sigma: f64) -> Vec<f64> {
    let r = radius as isize;
    let mut kernel: Vec<f64> = (-r..=r)
        .flat_map(|di| (-r..=r).map(move |dj| gaussian(spatial_distance(0, 0, di, dj), sigma)))
        .collect();

    let sum: f64 = kernel.iter().sum();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// Blur the interior of a grayscale image.
///
/// # Arguments
/// * `image` - Intensities, shape `(height, width)`
/// * `radius` - Kernel half-width
/// * `sigma` - Standard deviation (not validated here)
///
/// # Returns
/// Same-shape array; pixels within `radius` of the border are zero.
pub fn gaussian_blur(image: ArrayView2<f64>, radius: usize, sigma: f64) -> Array2<f64> {
    let (height, width) = image.dim();
    trace!(height, width, radius, sigma, "gaussian_blur");

    let mut output = vec![0.0f64; height * width];
    if width > 0 {
        let kernel = gaussian_kernel_2d(radius, sigma);
        let side = 2 * radius + 1;

        output
            .par_chunks_mut(width)
            .enumerate()
            .filter(|(x, _)| *x >= radius && *x + radius < height)
            .for_each(|(x, row)| {
                for y in radius..width.saturating_sub(radius) {
                    let mut sum = 0.0;
                    for (ki, i) in (x - radius..=x + radius).enumerate() {
                        for (kj, j) in (y - radius..=y + radius).enumerate() {
                            sum += image[[i, j]] * kernel[ki * side + kj];
                        }
                    }
                    row[y] = sum;
                }
            });
    }

    Array2::from_shape_vec((height, width), output).expect("Shape mismatch in gaussian_blur")
}

/// Blur every pixel of a grayscale image, replicating edges outward.
pub fn gaussian_blur_padded(
    image: ArrayView2<f64>,
    radius: usize,
    sigma: f64,
) -> FilterResult<Array2<f64>> {
    check_sigma("sigma", sigma)?;
    let (height, width) = image.dim();
    check_not_empty(height, width)?;
    debug!(height, width, radius, sigma, "gaussian blur");

    let padded = replication(image, radius)?;
    let blurred = gaussian_blur(padded.view(), radius, sigma);
    removal(blurred.view(), radius)
}

/// 8-bit version of [`gaussian_blur_padded`], rounding to the nearest value.
pub fn gaussian_blur_u8(image: ArrayView2<u8>, radius: usize, sigma: f64) -> FilterResult<Array2<u8>> {
    let input = image.mapv(f64::from);
    Ok(gaussian_blur_padded(input.view(), radius, sigma)?.mapv(quantize_u8))
}
