//! Boundary padding by edge replication, and its inverse.
//!
//! Both operations treat the first two axes as spatial (height, width)
//! and carry any further axes through unchanged, so the same functions
//! serve grayscale `(H, W)` arrays, colour `(H, W, C)` arrays and
//! `(H, W)` arrays of colour vectors.
//!
//! ## Shape Contract
//!
//! - [`replication`] returns `(H + 2w, W + 2w[, C])`
//! - [`removal`] returns `(H - 2w, W - 2w[, C])`
//!
//! Values are copied exactly (no interpolation), so
//! `removal(replication(image, w), w) == image` for every image and width.

use ndarray::{Array, ArrayView, AxisDescription, Axis, Dimension, RemoveAxis, Slice};
use tracing::trace;

use crate::error::{FilterError, FilterResult};

fn check_spatial_rank(ndim: usize) -> FilterResult<()> {
    if ndim < 2 {
        return Err(FilterError::InvalidDimensions(format!(
            "expected at least 2 axes (height, width), got {ndim}"
        )));
    }
    Ok(())
}

/// Slice selecting `start..start + len` on spatial axes and everything elsewhere.
fn spatial_window(ax: AxisDescription, start: usize, height: usize, width: usize) -> Slice {
    match ax.axis.index() {
        0 => Slice::from(start..start + height),
        1 => Slice::from(start..start + width),
        _ => Slice::from(..),
    }
}

/// Pad an image by replicating its outermost rows and columns.
///
/// The source is copied into the centre of a larger array, then the top,
/// bottom, left and right strips are filled in that order by repeating the
/// nearest valid row/column. Left and right strips span the full padded
/// height, so the corners take the value of the nearest corner pixel.
///
/// # Arguments
/// * `image` - Array with at least 2 axes; axes 0 and 1 are height and width
/// * `width` - Number of pixels added on each side
///
/// # Returns
/// Padded array of shape `(H + 2 * width, W + 2 * width, ...)`
pub fn replication<A, D>(image: ArrayView<A, D>, width: usize) -> FilterResult<Array<A, D>>
where
    A: Clone + Default,
    D: Dimension + RemoveAxis,
{
    check_spatial_rank(image.ndim())?;
    let inner_h = image.len_of(Axis(0));
    let inner_w = image.len_of(Axis(1));

    if width > 0 && (inner_h == 0 || inner_w == 0) {
        return Err(FilterError::EmptyImage);
    }

    trace!(inner_h, inner_w, width, "boundary::replication");

    let mut dim = image.raw_dim();
    dim[0] += 2 * width;
    dim[1] += 2 * width;
    let outer_h = dim[0];
    let outer_w = dim[1];

    let mut padded = Array::from_elem(dim, A::default());
    padded
        .slice_each_axis_mut(|ax| spatial_window(ax, width, inner_h, inner_w))
        .assign(&image);

    if width == 0 {
        return Ok(padded);
    }

    // Top
    let edge = padded.index_axis(Axis(0), width).to_owned();
    for i in 0..width {
        padded.index_axis_mut(Axis(0), i).assign(&edge);
    }

    // Bottom
    let edge = padded.index_axis(Axis(0), width + inner_h - 1).to_owned();
    for i in width + inner_h..outer_h {
        padded.index_axis_mut(Axis(0), i).assign(&edge);
    }

    // Left (full height, fills the left corners)
    let edge = padded.index_axis(Axis(1), width).to_owned();
    for j in 0..width {
        padded.index_axis_mut(Axis(1), j).assign(&edge);
    }

    // Right (full height, fills the right corners)
    let edge = padded.index_axis(Axis(1), width + inner_w - 1).to_owned();
    for j in width + inner_w..outer_w {
        padded.index_axis_mut(Axis(1), j).assign(&edge);
    }

    Ok(padded)
}

/// Remove a `width`-pixel border from every side of an image.
///
/// # Returns
/// The centre sub-rectangle `[width .. width + inner]` on both spatial
/// axes, as a new array of shape `(H - 2 * width, W - 2 * width, ...)`.
pub fn removal<A, D>(image: ArrayView<A, D>, width: usize) -> FilterResult<Array<A, D>>
where
    A: Clone,
    D: Dimension,
{
    check_spatial_rank(image.ndim())?;
    let outer_h = image.len_of(Axis(0));
    let outer_w = image.len_of(Axis(1));

    if 2 * width > outer_h || 2 * width > outer_w {
        return Err(FilterError::InvalidDimensions(format!(
            "cannot remove a {width}-pixel border from a {outer_h}x{outer_w} image"
        )));
    }

    let inner_h = outer_h - 2 * width;
    let inner_w = outer_w - 2 * width;

    Ok(image
        .slice_each_axis(|ax| spatial_window(ax, width, inner_h, inner_w))
        .to_owned())
}
