//! Laplacian edge detection, sharpening and Laplacian-of-Gaussian.
//!
//! The edge operator is the fixed 3x3 4-neighbourhood Laplacian
//!
//! ```text
//!  0  1  0
//!  1 -4  1
//!  0  1  0
//! ```
//!
//! so flat regions map to 0, bright spots to negative values and dark spots
//! to positive values. Sharpening subtracts the edge image from its source,
//! which pushes both sides of an edge apart.
//!
//! All functions work on grayscale `(height, width)` f64 images.

use ndarray::{Array2, ArrayView2, Zip};
use rayon::prelude::*;
use tracing::{debug, trace};

use super::blur::gaussian_blur_padded;
use super::boundary::{removal, replication};
use super::core::quantize_u8;
use super::params::{check_not_empty, LogParams};
use crate::error::{FilterError, FilterResult};

// ============================================================================
// Laplacian
// ============================================================================

/// Apply the 4-neighbour Laplacian to the interior of an image.
///
/// # Returns
/// Same-shape array; the outermost row and column on every side are zero.
pub fn laplacian_edges(image: ArrayView2<f64>) -> Array2<f64> {
    let (height, width) = image.dim();
    trace!(height, width, "laplacian_edges");

    let mut output = vec![0.0f64; height * width];
    if width > 0 {
        output
            .par_chunks_mut(width)
            .enumerate()
            .filter(|(x, _)| *x >= 1 && *x + 1 < height)
            .for_each(|(x, row)| {
                for y in 1..width.saturating_sub(1) {
                    row[y] = -4.0 * image[[x, y]]
                        + image[[x - 1, y]]
                        + image[[x + 1, y]]
                        + image[[x, y - 1]]
                        + image[[x, y + 1]];
                }
            });
    }

    Array2::from_shape_vec((height, width), output).expect("Shape mismatch in laplacian_edges")
}

/// Sharpen `source` by subtracting its Laplacian `edges`.
pub fn laplacian_sharpen(source: ArrayView2<f64>, edges: ArrayView2<f64>) -> FilterResult<Array2<f64>> {
    if source.dim() != edges.dim() {
        return Err(FilterError::SizeMismatch(format!(
            "source is {:?} but edges are {:?}",
            source.dim(),
            edges.dim()
        )));
    }
    Ok(Zip::from(&source).and(&edges).map_collect(|&s, &e| s - e))
}

// ============================================================================
// Laplacian of Gaussian
// ============================================================================

/// Laplacian-of-Gaussian sharpening.
///
/// 1. Gaussian-blur the image (edges replicated by `params.radius`) and
///    round every blurred sample to an integer, ties to even
/// 2. Laplacian of the blurred image (edges replicated by 1)
/// 3. Subtract the Laplacian from the blurred image
///
/// Smoothing first keeps the Laplacian from amplifying pixel noise.
///
/// # Returns
/// Same-shape array of integer values, not clamped
pub fn laplacian_of_gaussian(image: ArrayView2<f64>, params: &LogParams) -> FilterResult<Array2<f64>> {
    params.validate()?;
    let (height, width) = image.dim();
    check_not_empty(height, width)?;
    debug!(height, width, radius = params.radius, sigma = params.sigma, "laplacian of gaussian");

    let blurred = gaussian_blur_padded(image, params.radius, params.sigma)?.mapv(f64::round_ties_even);

    let padded = replication(blurred.view(), 1)?;
    let edges = removal(laplacian_edges(padded.view()).view(), 1)?;

    laplacian_sharpen(blurred.view(), edges.view())
}

/// 8-bit Laplacian-of-Gaussian, rounded and clamped to 0-255.
pub fn laplacian_of_gaussian_u8(image: ArrayView2<u8>, params: &LogParams) -> FilterResult<Array2<u8>> {
    let input = image.mapv(f64::from);
    Ok(laplacian_of_gaussian(input.view(), params)?.mapv(quantize_u8))
}
