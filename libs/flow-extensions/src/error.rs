//! # Flow Extension Errors
//!
//! Error types for flow extension operations.
//!
//! Configuration problems abort the whole operation ([`ExtensionError`]).
//! Problems with a single boundary ([`BoundaryError`]) are logged by the
//! filter and that boundary is skipped.

use thiserror::Error;

/// Fatal errors that abort the whole extension.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// Centerline direction mode was selected without centerlines
    #[error("Centerlines not set")]
    MissingCenterlines,

    /// Centerlines were supplied but contain no segment to project onto
    #[error("Centerlines contain no segment")]
    EmptyCenterlines,

    /// Unrecognized extension mode name
    #[error("Invalid extension mode: {name}")]
    UnknownExtensionMode { name: String },

    /// Unrecognized interpolation mode name
    #[error("Invalid interpolation mode: {name}")]
    UnknownInterpolationMode { name: String },

    /// A parameter is out of range
    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Too many points
    #[error("Too many points: {count} (max: {max})")]
    TooManyPoints { count: usize, max: usize },

    /// Too many polygons
    #[error("Too many polygons: {count} (max: {max})")]
    TooManyPolygons { count: usize, max: usize },
}

impl ExtensionError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

/// Per-boundary errors. The boundary is skipped, processing continues.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The boundary chain does not return to its start
    #[error("Boundary {index} is not a closed polyline")]
    NotClosed { index: usize },

    /// Too few points to build a ring
    #[error("Boundary {index} has {count} points (min: 3)")]
    TooFewPoints { index: usize, count: usize },

    /// A point id occurs twice in the loop
    #[error("Boundary {index} visits point {point_id} more than once")]
    RepeatedPoint { index: usize, point_id: u32 },

    /// The transition warp could not be fitted
    #[error("Boundary {index}: {source}")]
    Transition {
        index: usize,
        #[source]
        source: TransitionError,
    },
}

/// Errors fitting the landmark-based transition warp.
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    /// Source and target landmark lists differ in length
    #[error("Landmark count mismatch: {sources} sources, {targets} targets")]
    LandmarkCountMismatch { sources: usize, targets: usize },

    /// Not enough landmarks to determine the affine part
    #[error("Too few landmarks: {count} (min: 4)")]
    TooFewLandmarks { count: usize },

    /// Sigma must be positive and finite
    #[error("Invalid sigma: {sigma}")]
    InvalidSigma { sigma: f64 },

    /// The spline system could not be solved
    #[error("Singular landmark system: {message}")]
    SingularSystem { message: String },
}

/// Result alias for fatal extension errors.
pub type ExtensionResult<T> = Result<T, ExtensionError>;
