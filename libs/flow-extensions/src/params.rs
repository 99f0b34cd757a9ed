//! # Flow Extension Parameters
//!
//! Immutable configuration for [`FlowExtensionsFilter`](crate::FlowExtensionsFilter).
//! Every field has a default taken from `config::constants`, so partial
//! configurations deserialize cleanly:
//!
//! ```rust
//! use flow_extensions::{ExtensionMode, FlowExtensionParams};
//!
//! let params: FlowExtensionParams = serde_json::from_str(
//!     r#"{ "extension_mode": "UseNormalToBoundary", "extension_ratio": 5.0 }"#,
//! ).unwrap();
//! assert_eq!(params.extension_mode, ExtensionMode::UseNormalToBoundary);
//! assert_eq!(params.number_of_boundary_points, 50);
//! ```

use crate::error::{ExtensionError, ExtensionResult};
use config::constants::{
    regular_chord_length, FlowExtensionDefaults, DEFAULT_ADAPTIVE_EXTENSION_LENGTH,
    DEFAULT_ADAPTIVE_EXTENSION_RADIUS, DEFAULT_CENTERLINE_NORMAL_ESTIMATION_DISTANCE_RATIO,
    DEFAULT_EXTENSION_LENGTH, DEFAULT_EXTENSION_RADIUS, MIN_BOUNDARY_POINTS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the extrusion direction of a boundary is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExtensionMode {
    /// Average the local centerline tangent near the boundary barycenter.
    #[default]
    UseCenterlineDirection,
    /// Use the outward boundary normal.
    UseNormalToBoundary,
}

/// How the native boundary shape blends into the circular profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InterpolationMode {
    /// No blending; layers are ideal rings from the start.
    Linear,
    /// Thin-plate spline warp over the transition layers.
    #[default]
    ThinPlateSpline,
}

impl fmt::Display for ExtensionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseCenterlineDirection => f.write_str("UseCenterlineDirection"),
            Self::UseNormalToBoundary => f.write_str("UseNormalToBoundary"),
        }
    }
}

impl FromStr for ExtensionMode {
    type Err = ExtensionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "usecenterlinedirection" | "centerlinedirection" | "centerline" => {
                Ok(Self::UseCenterlineDirection)
            }
            "usenormaltoboundary" | "normaltoboundary" | "boundarynormal" => {
                Ok(Self::UseNormalToBoundary)
            }
            _ => Err(ExtensionError::UnknownExtensionMode {
                name: name.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ExtensionMode {
    type Error = ExtensionError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<ExtensionMode> for String {
    fn from(mode: ExtensionMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::ThinPlateSpline => f.write_str("ThinPlateSpline"),
        }
    }
}

impl FromStr for InterpolationMode {
    type Err = ExtensionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "linear" | "uselinearinterpolation" => Ok(Self::Linear),
            "thinplatespline" | "usethinplatesplineinterpolation" | "tps" => {
                Ok(Self::ThinPlateSpline)
            }
            _ => Err(ExtensionError::UnknownInterpolationMode {
                name: name.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for InterpolationMode {
    type Error = ExtensionError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<InterpolationMode> for String {
    fn from(mode: InterpolationMode) -> Self {
        mode.to_string()
    }
}

/// Parameters of a flow extension run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowExtensionParams {
    pub extension_mode: ExtensionMode,
    pub interpolation_mode: InterpolationMode,
    /// Extension length over boundary mean radius (adaptive length only)
    pub extension_ratio: f64,
    /// Fraction of the extension length used to blend into the ideal ring
    pub transition_ratio: f64,
    /// Fixed extension length (non-adaptive length only)
    pub extension_length: f64,
    /// Fixed ring radius (non-adaptive radius only)
    pub extension_radius: f64,
    pub adaptive_extension_length: bool,
    pub adaptive_extension_radius: bool,
    /// Ring resolution that sets the layer spacing
    pub number_of_boundary_points: u32,
    /// Centerline neighborhood, over mean radius, used to average the tangent
    pub centerline_normal_estimation_distance_ratio: f64,
    /// Thin-plate spline basis scale
    pub sigma: f64,
    /// Extraction indices of the boundaries to extend; `None` extends all
    pub boundary_ids: Option<Vec<usize>>,
}

impl Default for FlowExtensionParams {
    fn default() -> Self {
        let defaults = FlowExtensionDefaults::default();
        Self {
            extension_mode: ExtensionMode::default(),
            interpolation_mode: InterpolationMode::default(),
            extension_ratio: defaults.extension_ratio,
            transition_ratio: defaults.transition_ratio,
            extension_length: DEFAULT_EXTENSION_LENGTH,
            extension_radius: DEFAULT_EXTENSION_RADIUS,
            adaptive_extension_length: DEFAULT_ADAPTIVE_EXTENSION_LENGTH,
            adaptive_extension_radius: DEFAULT_ADAPTIVE_EXTENSION_RADIUS,
            number_of_boundary_points: defaults.number_of_boundary_points,
            centerline_normal_estimation_distance_ratio:
                DEFAULT_CENTERLINE_NORMAL_ESTIMATION_DISTANCE_RATIO,
            sigma: defaults.sigma,
            boundary_ids: None,
        }
    }
}

impl FlowExtensionParams {
    /// Checks value ranges. Centerline availability is checked by the filter.
    pub fn validate(&self) -> ExtensionResult<()> {
        non_negative("extension_ratio", self.extension_ratio)?;
        non_negative("transition_ratio", self.transition_ratio)?;
        non_negative("extension_length", self.extension_length)?;
        non_negative(
            "centerline_normal_estimation_distance_ratio",
            self.centerline_normal_estimation_distance_ratio,
        )?;

        if !self.adaptive_extension_radius
            && !(self.extension_radius.is_finite() && self.extension_radius > 0.0)
        {
            return Err(ExtensionError::invalid_parameter(
                "extension_radius",
                format!("must be positive, got {}", self.extension_radius),
            ));
        }
        if self.number_of_boundary_points < MIN_BOUNDARY_POINTS {
            return Err(ExtensionError::invalid_parameter(
                "number_of_boundary_points",
                format!(
                    "must be at least {MIN_BOUNDARY_POINTS}, got {}",
                    self.number_of_boundary_points
                ),
            ));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(ExtensionError::invalid_parameter(
                "sigma",
                format!("must be positive, got {}", self.sigma),
            ));
        }
        Ok(())
    }

    /// Whether boundary `index` is selected for extension.
    pub fn selects(&self, index: usize) -> bool {
        self.boundary_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(&index))
    }

    /// Extension length for a boundary of the given mean radius.
    pub fn extension_length_for(&self, mean_radius: f64) -> f64 {
        if self.adaptive_extension_length {
            mean_radius * self.extension_ratio
        } else {
            self.extension_length
        }
    }

    /// Distance between consecutive layers for a ring of the given radius.
    pub fn layer_spacing(&self, target_radius: f64) -> f64 {
        regular_chord_length(self.number_of_boundary_points, target_radius)
    }
}

fn non_negative(name: &'static str, value: f64) -> ExtensionResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ExtensionError::invalid_parameter(
            name,
            format!("must be finite and non-negative, got {value}"),
        ))
    }
}
