//! FilterKit Rust Extensions
//!
//! Classical pixel-domain image filters implemented in Rust with Python
//! bindings via PyO3 and WASM bindings for JavaScript:
//! - Bilateral filtering of grayscale and colour images, with per-channel,
//!   Euclidean RGB and perceptual L*ab similarity
//! - Gaussian blur
//! - Laplacian edge detection, sharpening and Laplacian-of-Gaussian
//!
//! ## Image Format
//! - **Grayscale**: (height, width)
//! - **Colour**: (height, width, 3) in **[B, G, R]** order
//!
//! Every filter has an f64 variant (unrounded) and a u8 variant that rounds
//! to the nearest value and clamps to 0-255.
//!
//! ## Example
//!
//! ```
//! use filterkit_rust::{BilateralParams, DistanceMetric};
//! use filterkit_rust::filters::pipeline::bilateral_bgr_u8;
//! use ndarray::Array3;
//!
//! let image = Array3::<u8>::from_elem((8, 8, 3), 128);
//! let params = BilateralParams::new(2, 3.0, 20.0).unwrap();
//! let smoothed = bilateral_bgr_u8(image.view(), &params, DistanceMetric::Lab).unwrap();
//! assert_eq!(smoothed.dim(), (8, 8, 3));
//! ```
//!
//! ## Logging
//! Pipelines emit `tracing` events (`debug` per call, `trace` per kernel).
//! The crate installs no subscriber.

pub mod error;
pub mod filters;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, FilterResult};
pub use filters::params::{BilateralParams, DistanceMetric, LogParams};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::{blur, color_science, edge, pipeline};
    use crate::filters::params::{BilateralParams, DistanceMetric, LogParams};

    fn to_py_err(err: FilterError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    // ========================================================================
    // Bilateral Filter
    // ========================================================================

    /// Bilateral-filter a grayscale u8 image.
    #[pyfunction]
    #[pyo3(signature = (image, radius=5, sigma_proximity=15.0, sigma_intensity=15.0))]
    pub fn bilateral_gray<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        radius: usize,
        sigma_proximity: f64,
        sigma_intensity: f64,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let params = BilateralParams::new(radius, sigma_proximity, sigma_intensity).map_err(to_py_err)?;
        let result = pipeline::grayscale_bilateral_u8(image.as_array(), &params).map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    /// Bilateral-filter a BGR u8 image.
    ///
    /// `mode` selects the similarity metric: "intensity" (each channel on
    /// its own), "rgb" (Euclidean colour distance) or "lab" (perceptual).
    #[pyfunction]
    #[pyo3(signature = (image, radius=5, sigma_proximity=15.0, sigma_intensity=15.0, mode="lab"))]
    pub fn bilateral_color<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
        sigma_proximity: f64,
        sigma_intensity: f64,
        mode: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let metric: DistanceMetric = mode.parse().map_err(to_py_err)?;
        let params = BilateralParams::new(radius, sigma_proximity, sigma_intensity).map_err(to_py_err)?;
        let result = pipeline::bilateral_bgr_u8(image.as_array(), &params, metric).map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Blur & Edges
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, radius=3, sigma=1.0))]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        radius: usize,
        sigma: f64,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let result = blur::gaussian_blur_u8(image.as_array(), radius, sigma).map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, radius=3, sigma=1.0))]
    pub fn laplacian_of_gaussian<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        radius: usize,
        sigma: f64,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let params = LogParams { radius, sigma };
        let result = edge::laplacian_of_gaussian_u8(image.as_array(), &params).map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Colour Conversion
    // ========================================================================

    /// Convert one (B, G, R) triple (0-255) to (L, a, b).
    #[pyfunction]
    pub fn rgb_to_lab(bgr: (f64, f64, f64)) -> (f64, f64, f64) {
        let [l, a, b] = color_science::rgb2lab([bgr.0, bgr.1, bgr.2]);
        (l, a, b)
    }

    /// Convert one (L, a, b) triple to (B, G, R), clamped to 0-255.
    #[pyfunction]
    pub fn lab_to_rgb(lab: (f64, f64, f64)) -> (f64, f64, f64) {
        let [b, g, r] = color_science::lab2rgb([lab.0, lab.1, lab.2]);
        (b, g, r)
    }

    /// FilterKit Rust extension module
    #[pymodule]
    pub fn filterkit_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(bilateral_gray, m)?)?;
        m.add_function(wrap_pyfunction!(bilateral_color, m)?)?;

        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(laplacian_of_gaussian, m)?)?;

        m.add_function(wrap_pyfunction!(rgb_to_lab, m)?)?;
        m.add_function(wrap_pyfunction!(lab_to_rgb, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::filterkit_rust;
