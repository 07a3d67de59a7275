//! Filter parameters and selectors.
//!
//! Parameters are plain structs with public fields so callers can build
//! them directly; [`BilateralParams::validate`] and [`LogParams::validate`]
//! are run once by every pipeline entry point before any pixel work.
//! Defaults match the settings the filters were tuned with.

use std::fmt;
use std::str::FromStr;

use crate::error::{FilterError, FilterResult};

/// Bilateral kernel parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilateralParams {
    /// Half-width of the square window; the window side is `2 * radius + 1`.
    pub radius: usize,
    /// Spatial bandwidth (standard deviation of the proximity Gaussian).
    pub sigma_proximity: f64,
    /// Similarity bandwidth (standard deviation of the intensity/colour Gaussian).
    pub sigma_intensity: f64,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            radius: 5,
            sigma_proximity: 15.0,
            sigma_intensity: 15.0,
        }
    }
}

impl BilateralParams {
    /// Create validated parameters.
    pub fn new(radius: usize, sigma_proximity: f64, sigma_intensity: f64) -> FilterResult<Self> {
        let params = Self {
            radius,
            sigma_proximity,
            sigma_intensity,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check that both sigmas are finite and strictly positive.
    pub fn validate(&self) -> FilterResult<()> {
        check_sigma("sigma_proximity", self.sigma_proximity)?;
        check_sigma("sigma_intensity", self.sigma_intensity)
    }
}

/// Laplacian-of-Gaussian parameters (the Gaussian stage).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogParams {
    /// Gaussian kernel radius.
    pub radius: usize,
    /// Gaussian standard deviation.
    pub sigma: f64,
}

impl Default for LogParams {
    fn default() -> Self {
        Self {
            radius: 3,
            sigma: 1.0,
        }
    }
}

impl LogParams {
    pub fn validate(&self) -> FilterResult<()> {
        check_sigma("sigma", self.sigma)
    }
}

/// Validate a Gaussian bandwidth.
pub(crate) fn check_sigma(name: &str, sigma: f64) -> FilterResult<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FilterError::InvalidParameter(format!(
            "{name} must be finite and positive, got {sigma}"
        )));
    }
    Ok(())
}

/// Reject images with zero height or width.
pub(crate) fn check_not_empty(height: usize, width: usize) -> FilterResult<()> {
    if height == 0 || width == 0 {
        return Err(FilterError::EmptyImage);
    }
    Ok(())
}

/// Similarity metric used when bilateral-filtering a colour image.
///
/// Each metric selects a different colour pipeline:
/// - `Intensity` - every channel filtered on its own with the truncated
///   intensity distance (weights not shared across channels)
/// - `Rgb` - one pass over colour vectors with Euclidean distance
/// - `Lab` - one pass in L*ab space with the perceptual distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    Intensity,
    Rgb,
    #[default]
    Lab,
}

impl FromStr for DistanceMetric {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "intensity" | "channel" | "per_channel" => Ok(Self::Intensity),
            "rgb" | "integrated" => Ok(Self::Rgb),
            "lab" => Ok(Self::Lab),
            other => Err(FilterError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Intensity => "intensity",
            Self::Rgb => "rgb",
            Self::Lab => "lab",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilateral_params_valid() {
        let params = BilateralParams::new(2, 1.5, 30.0).unwrap();
        assert_eq!(params.radius, 2);
        assert!(BilateralParams::default().validate().is_ok());
    }

    #[test]
    fn test_bilateral_params_invalid() {
        assert!(BilateralParams::new(1, 0.0, 1.0).is_err());
        assert!(BilateralParams::new(1, 1.0, -1.0).is_err());
        assert!(BilateralParams::new(1, f64::NAN, 1.0).is_err());
        assert!(BilateralParams::new(1, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_log_params() {
        assert_eq!(LogParams::default(), LogParams { radius: 3, sigma: 1.0 });
        assert!(LogParams { radius: 1, sigma: 0.0 }.validate().is_err());
    }

    #[test]
    fn test_check_not_empty() {
        assert!(check_not_empty(1, 1).is_ok());
        assert_eq!(check_not_empty(0, 4), Err(FilterError::EmptyImage));
        assert_eq!(check_not_empty(4, 0), Err(FilterError::EmptyImage));
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!("lab".parse::<DistanceMetric>().unwrap(), DistanceMetric::Lab);
        assert_eq!("RGB".parse::<DistanceMetric>().unwrap(), DistanceMetric::Rgb);
        assert_eq!("channel".parse::<DistanceMetric>().unwrap(), DistanceMetric::Intensity);
        assert_eq!(
            "hsv".parse::<DistanceMetric>(),
            Err(FilterError::UnknownMode("hsv".to_string()))
        );
    }

    #[test]
    fn test_metric_display_roundtrip() {
        for metric in [DistanceMetric::Intensity, DistanceMetric::Rgb, DistanceMetric::Lab] {
            assert_eq!(metric.to_string().parse::<DistanceMetric>().unwrap(), metric);
        }
    }
}
