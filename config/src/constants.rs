//! # Configuration Constants
//!
//! Centralized constants for the flow extension pipeline. Filter defaults,
//! geometric tolerances and safety limits are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Filter Defaults**: Values used when a parameter is not supplied
//! - **Limits**: Maximum values for safety bounds

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance, and as the length below which a vector is treated
/// as degenerate before normalization.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Relative tolerance for centerline direction estimation.
///
/// An anchor-to-projection vector only contributes to the estimated
/// centerline tangent when its length exceeds this factor times the mean
/// boundary radius.
///
/// # Example
///
/// ```rust
/// use config::constants::CENTERLINE_TOLERANCE_FACTOR;
///
/// let mean_radius = 2.0;
/// let tolerance = CENTERLINE_TOLERANCE_FACTOR * mean_radius;
/// assert!(tolerance < 1e-3);
/// ```
pub const CENTERLINE_TOLERANCE_FACTOR: f64 = 1e-4;

/// Singular value threshold used when solving the thin-plate spline system.
pub const SPLINE_SOLVE_EPSILON: f64 = 1e-12;

/// Tolerance for checking that a fitted warp reproduces its landmarks.
pub const LANDMARK_TOLERANCE: f64 = 1e-6;

// =============================================================================
// FILTER DEFAULTS
// =============================================================================

/// Default extension length as a multiple of the boundary mean radius.
///
/// Only used when the extension length is adaptive.
pub const DEFAULT_EXTENSION_RATIO: f64 = 1.0;

/// Default fraction of the extension length over which the native boundary
/// shape blends into the circular profile.
pub const DEFAULT_TRANSITION_RATIO: f64 = 0.5;

/// Default fixed extension length.
///
/// Zero means "no extension" unless adaptive length is enabled.
pub const DEFAULT_EXTENSION_LENGTH: f64 = 0.0;

/// Default fixed extension radius, used when the radius is not adaptive.
pub const DEFAULT_EXTENSION_RADIUS: f64 = 1.0;

/// Default centerline neighborhood size, as a multiple of the boundary mean
/// radius, over which the centerline tangent is averaged.
pub const DEFAULT_CENTERLINE_NORMAL_ESTIMATION_DISTANCE_RATIO: f64 = 1.0;

/// Default number of boundary points used to derive the layer spacing.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_NUMBER_OF_BOUNDARY_POINTS;
///
/// let spacing = 2.0 * (std::f64::consts::PI / DEFAULT_NUMBER_OF_BOUNDARY_POINTS as f64).sin();
/// assert!(spacing < 0.2);
/// ```
pub const DEFAULT_NUMBER_OF_BOUNDARY_POINTS: u32 = 50;

/// Smallest ring resolution that still forms a polygon.
pub const MIN_BOUNDARY_POINTS: u32 = 3;

/// Default thin-plate spline sigma (basis distance scale).
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Whether the extension length follows the boundary mean radius by default.
pub const DEFAULT_ADAPTIVE_EXTENSION_LENGTH: bool = true;

/// Whether the extension radius follows the boundary shape by default.
pub const DEFAULT_ADAPTIVE_EXTENSION_RADIUS: bool = true;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of points in an output mesh.
///
/// Safety limit against a tiny radius combined with a huge extension length.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_POINTS;
///
/// let point_count = 1000;
/// assert!(point_count < MAX_POINTS);
/// ```
pub const MAX_POINTS: usize = 10_000_000;

/// Maximum number of polygons in an output mesh.
pub const MAX_POLYGONS: usize = 20_000_000;

// =============================================================================
// DEFAULTS SNAPSHOT
// =============================================================================

/// Immutable snapshot of the scalar filter defaults.
///
/// # Examples
/// ```
/// use config::constants::FlowExtensionDefaults;
/// let defaults = FlowExtensionDefaults::default();
/// assert_eq!(defaults.transition_ratio, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowExtensionDefaults {
    /// Extension length over mean radius.
    pub extension_ratio: f64,
    /// Fraction of the extension used for the shape transition.
    pub transition_ratio: f64,
    /// Ring resolution used to derive the layer spacing.
    pub number_of_boundary_points: u32,
    /// Thin-plate spline sigma.
    pub sigma: f64,
}

impl FlowExtensionDefaults {
    /// Builds a snapshot enforcing strict validation of the supplied values.
    ///
    /// # Examples
    /// ```
    /// use config::constants::FlowExtensionDefaults;
    /// let defaults = FlowExtensionDefaults::new(2.0, 0.25, 24, 1.0).expect("valid defaults");
    /// assert_eq!(defaults.number_of_boundary_points, 24);
    /// ```
    pub fn new(
        extension_ratio: f64,
        transition_ratio: f64,
        number_of_boundary_points: u32,
        sigma: f64,
    ) -> Result<Self, ConfigError> {
        if !(extension_ratio.is_finite() && extension_ratio >= 0.0) {
            return Err(ConfigError::InvalidRatio(extension_ratio));
        }
        if !(transition_ratio.is_finite() && transition_ratio >= 0.0) {
            return Err(ConfigError::InvalidRatio(transition_ratio));
        }
        if number_of_boundary_points < MIN_BOUNDARY_POINTS {
            return Err(ConfigError::InvalidBoundaryPoints(number_of_boundary_points));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(ConfigError::InvalidSigma(sigma));
        }
        Ok(Self {
            extension_ratio,
            transition_ratio,
            number_of_boundary_points,
            sigma,
        })
    }
}

impl Default for FlowExtensionDefaults {
    fn default() -> Self {
        Self {
            extension_ratio: DEFAULT_EXTENSION_RATIO,
            transition_ratio: DEFAULT_TRANSITION_RATIO,
            number_of_boundary_points: DEFAULT_NUMBER_OF_BOUNDARY_POINTS,
            sigma: DEFAULT_SIGMA,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when a ratio is negative or not finite.
    InvalidRatio(f64),
    /// Raised when the ring resolution is too small to form a polygon.
    InvalidBoundaryPoints(u32),
    /// Raised when sigma is zero, negative or not finite.
    InvalidSigma(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRatio(value) => {
                write!(f, "ratio must be finite and non-negative: {value}")
            }
            ConfigError::InvalidBoundaryPoints(value) => {
                write!(f, "number_of_boundary_points must be >= 3: {value}")
            }
            ConfigError::InvalidSigma(value) => {
                write!(f, "sigma must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Chord length of a regular polygon with `points` vertices on a circle of
/// the given radius.
///
/// This is the spacing between consecutive extrusion layers.
///
/// # Example
///
/// ```rust
/// use config::constants::regular_chord_length;
///
/// // A hexagon's side equals its circumradius
/// assert!((regular_chord_length(6, 2.0) - 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn regular_chord_length(points: u32, radius: f64) -> f64 {
    2.0 * (std::f64::consts::PI / points as f64).sin() * radius
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
