//! Detector selection and tuning, loadable from TOML.

use std::f64::consts::PI;

use occulta_hull::DepthPolicy;
use occulta_mesh::{EclipseError, Result};
use serde::{Deserialize, Serialize};

/// Default back-face threshold of the ray detector, in radians. Values of
/// `PI` or more disable culling.
pub const DEFAULT_BACKFACE_THRESHOLD: f64 = 1.25 * PI;

/// Default absolute tolerance for ray/plane tests.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default scale of the Graham boundary band.
pub const DEFAULT_DISTANCE_FACTOR: f64 = 1.0;

/// Which detector [`detect_eclipses`](crate::detect_eclipses) runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Facing direction only; no eclipses.
    Horizon,
    /// Exact ray casting.
    RayTrace,
    /// Convex hull containment of centers and vertices.
    ConvexHull,
    /// Monotone-chain hull with a boundary band query.
    #[default]
    Graham,
}

/// Settings for one detection run.
///
/// Every field has a default, so a TOML document only names what it
/// changes:
///
/// ```
/// use occulta::{Algorithm, EclipseSettings};
///
/// let settings = EclipseSettings::from_toml_str("algorithm = \"ray_trace\"").unwrap();
/// assert_eq!(settings.algorithm, Algorithm::RayTrace);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EclipseSettings {
    /// Detector to run.
    pub algorithm: Algorithm,
    /// Occluders whose normal is further than this from the line of sight
    /// are skipped by the ray detector (radians).
    pub backface_threshold: f64,
    /// Ray/plane parallelism tolerance and minimum hit distance.
    pub tolerance: f64,
    /// Scale of the Graham boundary band; zero disables it.
    pub distance_factor: f64,
    /// Body ordering of the hull detectors.
    pub depth_policy: DepthPolicy,
}

impl Default for EclipseSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            backface_threshold: DEFAULT_BACKFACE_THRESHOLD,
            tolerance: DEFAULT_TOLERANCE,
            distance_factor: DEFAULT_DISTANCE_FACTOR,
            depth_policy: DepthPolicy::default(),
        }
    }
}

impl EclipseSettings {
    /// Settings with the defaults and the given algorithm.
    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Check the numeric fields.
    pub fn validate(&self) -> Result<()> {
        if !(self.backface_threshold.is_finite() && self.backface_threshold > 0.0) {
            return Err(EclipseError::InvalidSettings(format!(
                "backface_threshold must be positive and finite, got {}",
                self.backface_threshold
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EclipseError::InvalidSettings(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if !(self.distance_factor.is_finite() && self.distance_factor >= 0.0) {
            return Err(EclipseError::InvalidSettings(format!(
                "distance_factor must be non-negative and finite, got {}",
                self.distance_factor
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s).map_err(|e| EclipseError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EclipseError::Config(e.to_string()))
    }
}
