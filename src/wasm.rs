//! WebAssembly exports for FilterKit filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images travel as flat row-major byte buffers:
//! - **Grayscale**: length = width * height
//! - **Colour**: length = width * height * 3, channels in [B, G, R] order
//!
//! Invalid dimensions or parameters are returned as a JavaScript error
//! string.

use ndarray::{Array2, Array3};
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::filters::params::{BilateralParams, DistanceMetric};
use crate::filters::pipeline::{bilateral_bgr_u8, grayscale_bilateral_u8};

fn to_js_err(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn buffer_len_err(expected: usize, actual: usize) -> JsValue {
    JsValue::from_str(&format!("expected buffer of {expected} bytes, got {actual}"))
}

// ============================================================================
// Bilateral Filter
// ============================================================================

/// Bilateral-filter a grayscale image.
///
/// # Arguments
/// * `data` - Flat array of intensity bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `radius` - Kernel half-width
/// * `sigma_proximity` - Spatial bandwidth
/// * `sigma_intensity` - Similarity bandwidth
///
/// # Returns
/// Flat array of filtered intensity bytes
#[wasm_bindgen]
pub fn bilateral_gray_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: usize,
    sigma_proximity: f64,
    sigma_intensity: f64,
) -> Result<Vec<u8>, JsValue> {
    let input = Array2::from_shape_vec((height, width), data.to_vec())
        .map_err(|_| buffer_len_err(width * height, data.len()))?;

    let params = BilateralParams::new(radius, sigma_proximity, sigma_intensity).map_err(to_js_err)?;
    let result = grayscale_bilateral_u8(input.view(), &params).map_err(to_js_err)?;
    Ok(result.into_raw_vec_and_offset().0)
}

/// Bilateral-filter a BGR colour image.
///
/// `mode` is one of "intensity", "rgb" or "lab".
#[wasm_bindgen]
pub fn bilateral_color_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: usize,
    sigma_proximity: f64,
    sigma_intensity: f64,
    mode: &str,
) -> Result<Vec<u8>, JsValue> {
    let input = Array3::from_shape_vec((height, width, 3), data.to_vec())
        .map_err(|_| buffer_len_err(width * height * 3, data.len()))?;

    let metric: DistanceMetric = mode.parse().map_err(to_js_err)?;
    let params = BilateralParams::new(radius, sigma_proximity, sigma_intensity).map_err(to_js_err)?;
    let result = bilateral_bgr_u8(input.view(), &params, metric).map_err(to_js_err)?;
    Ok(result.into_raw_vec_and_offset().0)
}
