//! Bilateral filter pipelines.
//!
//! Every pipeline validates its parameters and input once, pads the image
//! by the kernel radius with [`replication`], runs the bilateral engine and
//! removes the padding again, so every original pixel is filtered and the
//! output has the input's shape.
//!
//! ## Colour Pipelines
//!
//! | Pipeline | Distance | Weights |
//! |----------|----------|---------|
//! | [`rgb_bilateral_by_channel_f64`] | truncated intensity | per channel |
//! | [`rgb_bilateral_integrated_f64`] | Euclidean RGB | shared by all channels |
//! | [`lab_bilateral_f64`] | perceptual L*ab | shared, computed in L*ab |
//!
//! Colour images are `(height, width, 3)` arrays in **[B, G, R]** order;
//! the L*ab pipeline relies on that order when converting.
//!
//! The `_u8` variants filter in f64 and round to the nearest 8-bit value.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use tracing::debug;

use super::bilateral::{
    bilateral_filter, channels_from_pixels, pixels_from_channels, IntensityDistance, LabDistance,
    RgbDistance,
};
use super::boundary::{removal, replication};
use super::color_science::{bgr_image_to_lab, lab_image_to_bgr};
use super::core::quantize_u8;
use super::params::{check_not_empty, BilateralParams, DistanceMetric};
use crate::error::{FilterError, FilterResult};

fn check_color_image(image: &ArrayView3<f64>) -> FilterResult<()> {
    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(FilterError::InvalidDimensions(format!(
            "expected (height, width, 3) colour image, got {channels} channels"
        )));
    }
    check_not_empty(height, width)
}

fn grayscale_unchecked(image: ArrayView2<f64>, params: &BilateralParams) -> FilterResult<Array2<f64>> {
    let padded = replication(image, params.radius)?;
    let filtered = bilateral_filter(padded.view(), params, &IntensityDistance);
    removal(filtered.view(), params.radius)
}

// ============================================================================
// Grayscale
// ============================================================================

/// Bilateral-filter a grayscale image.
///
/// # Arguments
/// * `image` - Intensities, shape `(height, width)`, any range
/// * `params` - Kernel radius and sigmas
///
/// # Returns
/// Filtered image of the same shape (not rounded)
pub fn grayscale_bilateral_f64(
    image: ArrayView2<f64>,
    params: &BilateralParams,
) -> FilterResult<Array2<f64>> {
    params.validate()?;
    let (height, width) = image.dim();
    check_not_empty(height, width)?;

    debug!(
        height,
        width,
        radius = params.radius,
        sigma_proximity = params.sigma_proximity,
        sigma_intensity = params.sigma_intensity,
        "grayscale bilateral"
    );

    grayscale_unchecked(image, params)
}

/// Bilateral-filter an 8-bit grayscale image.
pub fn grayscale_bilateral_u8(
    image: ArrayView2<u8>,
    params: &BilateralParams,
) -> FilterResult<Array2<u8>> {
    let input = image.mapv(f64::from);
    Ok(grayscale_bilateral_f64(input.view(), params)?.mapv(quantize_u8))
}

// ============================================================================
// Colour
// ============================================================================

/// Bilateral-filter each colour channel as an independent grayscale image.
///
/// Each channel gets its own weights, so a neighbour that differs in one
/// channel only is rejected in that channel alone and hues can shift
/// across strong edges.
pub fn rgb_bilateral_by_channel_f64(
    image: ArrayView3<f64>,
    params: &BilateralParams,
) -> FilterResult<Array3<f64>> {
    params.validate()?;
    check_color_image(&image)?;
    let (height, width, _) = image.dim();

    debug!(height, width, radius = params.radius, "per-channel bilateral");

    let mut output = Array3::<f64>::zeros((height, width, 3));
    for c in 0..3 {
        let plane = grayscale_unchecked(image.index_axis(Axis(2), c), params)?;
        output.index_axis_mut(Axis(2), c).assign(&plane);
    }
    Ok(output)
}

/// Bilateral-filter colour vectors with Euclidean colour distance.
///
/// One weight per neighbour, applied to all three channels.
pub fn rgb_bilateral_integrated_f64(
    image: ArrayView3<f64>,
    params: &BilateralParams,
) -> FilterResult<Array3<f64>> {
    params.validate()?;
    check_color_image(&image)?;
    let (height, width, _) = image.dim();

    debug!(height, width, radius = params.radius, "integrated rgb bilateral");

    let pixels = pixels_from_channels(image)?;
    let padded = replication(pixels.view(), params.radius)?;
    let filtered = bilateral_filter(padded.view(), params, &RgbDistance);
    let inner = removal(filtered.view(), params.radius)?;
    Ok(channels_from_pixels(inner.view()))
}

/// Bilateral-filter a `[B, G, R]` image in L*ab space.
///
/// The padded image is converted to L*ab, filtered with the perceptual
/// distance, and converted back; results are clamped to 0-255 by the
/// inverse conversion.
pub fn lab_bilateral_f64(
    image: ArrayView3<f64>,
    params: &BilateralParams,
) -> FilterResult<Array3<f64>> {
    params.validate()?;
    check_color_image(&image)?;
    let (height, width, _) = image.dim();

    debug!(height, width, radius = params.radius, "lab bilateral");

    let pixels = pixels_from_channels(image)?;
    let padded = replication(pixels.view(), params.radius)?;
    let lab = bgr_image_to_lab(padded.view());
    let filtered = bilateral_filter(lab.view(), params, &LabDistance);
    let bgr = lab_image_to_bgr(filtered.view());
    let inner = removal(bgr.view(), params.radius)?;
    Ok(channels_from_pixels(inner.view()))
}

pub fn rgb_bilateral_by_channel_u8(
    image: ArrayView3<u8>,
    params: &BilateralParams,
) -> FilterResult<Array3<u8>> {
    let input = image.mapv(f64::from);
    Ok(rgb_bilateral_by_channel_f64(input.view(), params)?.mapv(quantize_u8))
}

pub fn rgb_bilateral_integrated_u8(
    image: ArrayView3<u8>,
    params: &BilateralParams,
) -> FilterResult<Array3<u8>> {
    let input = image.mapv(f64::from);
    Ok(rgb_bilateral_integrated_f64(input.view(), params)?.mapv(quantize_u8))
}

pub fn lab_bilateral_u8(image: ArrayView3<u8>, params: &BilateralParams) -> FilterResult<Array3<u8>> {
    let input = image.mapv(f64::from);
    Ok(lab_bilateral_f64(input.view(), params)?.mapv(quantize_u8))
}

/// Bilateral-filter a `[B, G, R]` image with the pipeline matching `metric`.
///
/// | Metric | Pipeline |
/// |--------|----------|
/// | `Intensity` | [`rgb_bilateral_by_channel_f64`] |
/// | `Rgb` | [`rgb_bilateral_integrated_f64`] |
/// | `Lab` | [`lab_bilateral_f64`] |
pub fn bilateral_bgr_f64(
    image: ArrayView3<f64>,
    params: &BilateralParams,
    metric: DistanceMetric,
) -> FilterResult<Array3<f64>> {
    match metric {
        DistanceMetric::Intensity => rgb_bilateral_by_channel_f64(image, params),
        DistanceMetric::Rgb => rgb_bilateral_integrated_f64(image, params),
        DistanceMetric::Lab => lab_bilateral_f64(image, params),
    }
}

pub fn bilateral_bgr_u8(
    image: ArrayView3<u8>,
    params: &BilateralParams,
    metric: DistanceMetric,
) -> FilterResult<Array3<u8>> {
    let input = image.mapv(f64::from);
    Ok(bilateral_bgr_f64(input.view(), params, metric)?.mapv(quantize_u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params(radius: usize, sigma_proximity: f64, sigma_intensity: f64) -> BilateralParams {
        BilateralParams {
            radius,
            sigma_proximity,
            sigma_intensity,
        }
    }

    fn color_image(height: usize, width: usize, bgr: [f64; 3]) -> Array3<f64> {
        Array3::from_shape_fn((height, width, 3), |(_, _, c)| bgr[c])
    }

    #[test]
    fn test_grayscale_uniform_every_pixel() {
        let img = Array2::from_elem((5, 5), 100.0);
        let result = grayscale_bilateral_f64(img.view(), &params(1, 1.0, 1.0)).unwrap();

        assert_eq!(result.dim(), (5, 5));
        for &v in result.iter() {
            assert_abs_diff_eq!(v, 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_grayscale_radius_larger_than_image() {
        let img = Array2::from_elem((3, 4), 60.0);
        let result = grayscale_bilateral_f64(img.view(), &params(6, 2.0, 10.0)).unwrap();
        assert_eq!(result.dim(), (3, 4));
        for &v in result.iter() {
            assert_abs_diff_eq!(v, 60.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_grayscale_preserves_edge() {
        // Step edge between 20 and 220
        let img = Array2::from_shape_fn((8, 8), |(_, x)| if x < 4 { 20.0 } else { 220.0 });
        let result = grayscale_bilateral_f64(img.view(), &params(2, 2.0, 10.0)).unwrap();

        for y in 0..8 {
            assert_abs_diff_eq!(result[[y, 3]], 20.0, epsilon = 1e-6);
            assert_abs_diff_eq!(result[[y, 4]], 220.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_grayscale_smooths_small_noise() {
        let mut img = Array2::from_elem((7, 7), 100.0);
        img[[3, 3]] = 104.0;
        let result = grayscale_bilateral_f64(img.view(), &params(1, 1.0, 30.0)).unwrap();

        assert!(result[[3, 3]] < 104.0);
        assert!(result[[3, 3]] > 100.0);
        assert!(result[[3, 4]] > 100.0);
    }

    #[test]
    fn test_grayscale_u8_rounds() {
        let img = Array2::from_elem((4, 4), 77u8);
        let result = grayscale_bilateral_u8(img.view(), &BilateralParams::default()).unwrap();
        assert!(result.iter().all(|&v| v == 77));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let img = Array2::from_elem((4, 4), 1.0);
        assert!(matches!(
            grayscale_bilateral_f64(img.view(), &params(1, 0.0, 1.0)),
            Err(FilterError::InvalidParameter(_))
        ));

        let color = color_image(4, 4, [1.0, 2.0, 3.0]);
        assert!(matches!(
            lab_bilateral_f64(color.view(), &params(1, 1.0, -2.0)),
            Err(FilterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = Array2::<f64>::zeros((0, 5));
        assert_eq!(
            grayscale_bilateral_f64(img.view(), &params(1, 1.0, 1.0)),
            Err(FilterError::EmptyImage)
        );

        let color = Array3::<f64>::zeros((3, 0, 3));
        assert_eq!(
            rgb_bilateral_integrated_f64(color.view(), &params(1, 1.0, 1.0)),
            Err(FilterError::EmptyImage)
        );
    }

    #[test]
    fn test_color_requires_three_channels() {
        let rgba = Array3::<f64>::zeros((4, 4, 4));
        for metric in [DistanceMetric::Intensity, DistanceMetric::Rgb, DistanceMetric::Lab] {
            assert!(matches!(
                bilateral_bgr_f64(rgba.view(), &params(1, 1.0, 1.0), metric),
                Err(FilterError::InvalidDimensions(_))
            ));
        }
    }

    #[test]
    fn test_by_channel_matches_grayscale_planes() {
        let img = Array3::from_shape_fn((6, 5, 3), |(y, x, c)| ((y * 37 + x * 11 + c * 53) % 256) as f64);
        let p = params(2, 1.5, 25.0);
        let result = rgb_bilateral_by_channel_f64(img.view(), &p).unwrap();

        for c in 0..3 {
            let plane = grayscale_bilateral_f64(img.index_axis(Axis(2), c), &p).unwrap();
            assert_eq!(result.index_axis(Axis(2), c), plane);
        }
    }

    #[test]
    fn test_per_channel_vs_integrated_weights() {
        // One neighbour differs slightly in B and strongly in G
        let mut img = color_image(5, 5, [10.0, 20.0, 30.0]);
        img[[2, 3, 0]] = 12.0;
        img[[2, 3, 1]] = 200.0;
        let p = params(1, 1.0, 5.0);

        let by_channel = rgb_bilateral_by_channel_f64(img.view(), &p).unwrap();
        let integrated = rgb_bilateral_integrated_f64(img.view(), &p).unwrap();

        // Per channel, B sees a close neighbour and is pulled toward it
        assert!(by_channel[[2, 2, 0]] > 10.1);
        // Integrated, the neighbour is far in colour space and ignored in every channel
        assert_abs_diff_eq!(integrated[[2, 2, 0]], 10.0, epsilon = 1e-6);
        // Both reject the strong G outlier
        assert_abs_diff_eq!(by_channel[[2, 2, 1]], 20.0, epsilon = 1e-3);
        assert_abs_diff_eq!(integrated[[2, 2, 1]], 20.0, epsilon = 1e-3);
    }

    #[test]
    fn test_lab_uniform_image() {
        let img = color_image(4, 6, [30.0, 120.0, 200.0]);
        let result = lab_bilateral_f64(img.view(), &params(2, 2.0, 10.0)).unwrap();

        assert_eq!(result.dim(), (4, 6, 3));
        for y in 0..4 {
            for x in 0..6 {
                for c in 0..3 {
                    assert_abs_diff_eq!(result[[y, x, c]], img[[y, x, c]], epsilon = 0.5);
                }
            }
        }
    }

    #[test]
    fn test_lab_smooths_near_colour_noise() {
        let mut img = color_image(7, 7, [100.0, 120.0, 140.0]);
        img[[3, 3, 0]] = 108.0;
        let result = lab_bilateral_f64(img.view(), &params(1, 1.0, 10.0)).unwrap();

        // The outlier is pulled toward its surroundings and spreads into them
        assert_abs_diff_eq!(result[[3, 3, 0]], 101.7045, epsilon = 0.05);
        assert_abs_diff_eq!(result[[3, 4, 0]], 100.9387, epsilon = 0.05);
        assert_abs_diff_eq!(result[[3, 3, 1]], 120.0, epsilon = 0.05);
        assert_abs_diff_eq!(result[[3, 3, 2]], 140.0, epsilon = 0.05);
    }

    #[test]
    fn test_lab_preserves_colour_edge() {
        let img = Array3::from_shape_fn((8, 8, 3), |(_, x, c)| {
            if x < 4 {
                [40.0, 40.0, 200.0][c]
            } else {
                [200.0, 60.0, 30.0][c]
            }
        });
        let result = lab_bilateral_f64(img.view(), &params(1, 1.0, 10.0)).unwrap();

        for c in 0..3 {
            assert_abs_diff_eq!(result[[3, 3, c]], img[[3, 3, c]], epsilon = 0.2);
            assert_abs_diff_eq!(result[[3, 4, c]], img[[3, 4, c]], epsilon = 0.5);
        }
    }

    #[test]
    fn test_u8_color_variants_round_filtered_values() {
        let mut img = Array3::from_shape_fn((7, 7, 3), |(_, _, c)| [100u8, 120, 140][c]);
        img[[3, 3, 0]] = 110;
        let img_f64 = img.mapv(f64::from);
        let p = params(1, 1.0, 30.0);

        let by_channel = rgb_bilateral_by_channel_u8(img.view(), &p).unwrap();
        let integrated = rgb_bilateral_integrated_u8(img.view(), &p).unwrap();

        assert_eq!(
            by_channel,
            rgb_bilateral_by_channel_f64(img_f64.view(), &p).unwrap().mapv(quantize_u8)
        );
        assert_eq!(
            integrated,
            rgb_bilateral_integrated_f64(img_f64.view(), &p).unwrap().mapv(quantize_u8)
        );

        // Noise is smoothed but not erased; untouched channels stay exact
        for out in [&by_channel, &integrated] {
            assert!(out[[3, 3, 0]] > 100 && out[[3, 3, 0]] < 110);
            assert!(out[[3, 4, 0]] > 100);
            assert_eq!(out[[3, 3, 1]], 120);
            assert_eq!(out[[0, 0, 0]], 100);
        }
    }

    #[test]
    fn test_lab_u8_uniform_image() {
        let img = Array3::from_shape_fn((5, 5, 3), |(_, _, c)| [200u8, 40, 90][c]);
        let result = lab_bilateral_u8(img.view(), &params(1, 1.0, 5.0)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_dispatch_matches_pipelines() {
        let img = Array3::from_shape_fn((5, 6, 3), |(y, x, c)| ((y * 19 + x * 7 + c * 90) % 256) as f64);
        let p = params(1, 1.0, 20.0);

        assert_eq!(
            bilateral_bgr_f64(img.view(), &p, DistanceMetric::Intensity).unwrap(),
            rgb_bilateral_by_channel_f64(img.view(), &p).unwrap()
        );
        assert_eq!(
            bilateral_bgr_f64(img.view(), &p, DistanceMetric::Rgb).unwrap(),
            rgb_bilateral_integrated_f64(img.view(), &p).unwrap()
        );
        assert_eq!(
            bilateral_bgr_f64(img.view(), &p, DistanceMetric::Lab).unwrap(),
            lab_bilateral_f64(img.view(), &p).unwrap()
        );
    }

    #[test]
    fn test_u8_color_variants_keep_shape() {
        let img = Array3::from_shape_fn((4, 3, 3), |(y, x, c)| (y * 40 + x * 20 + c * 5) as u8);
        let p = params(1, 1.0, 15.0);

        assert_eq!(rgb_bilateral_by_channel_u8(img.view(), &p).unwrap().dim(), (4, 3, 3));
        assert_eq!(rgb_bilateral_integrated_u8(img.view(), &p).unwrap().dim(), (4, 3, 3));
        assert_eq!(
            bilateral_bgr_u8(img.view(), &p, DistanceMetric::Lab).unwrap().dim(),
            (4, 3, 3)
        );
    }
}
