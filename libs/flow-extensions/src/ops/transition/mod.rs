//! # Transition Blending
//!
//! Near the surface, extension layers are bent from the ideal circular
//! cross-section toward the native boundary shape:
//! - **Linear**: no warp, rings stay circular from the first layer
//! - **ThinPlateSpline**: landmarks pin the ideal base ring onto the native
//!   boundary and a translated copy onto itself, so the warp fades out over
//!   the transition length

mod spline;


pub use spline::{r2_log_r, ThinPlateSpline, MIN_LANDMARKS};

use crate::error::TransitionError;
use crate::params::InterpolationMode;
use glam::DVec3;

/// Paired source and target landmarks for one boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    pub sources: Vec<DVec3>,
    pub targets: Vec<DVec3>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Landmarks blending `ideal_ring` into `native_points` at the boundary,
    /// and holding the ring fixed `transition_length` along `direction`.
    ///
    /// Pairs are matched by position: the ring must have one point per
    /// native point.
    pub fn for_boundary(
        ideal_ring: &[DVec3],
        native_points: &[DVec3],
        direction: DVec3,
        transition_length: f64,
    ) -> Self {
        let mut landmarks = Self::new();
        for (&ideal, &native) in ideal_ring.iter().zip(native_points) {
            landmarks.push(ideal, native);
        }
        let offset = direction * transition_length;
        for &ideal in ideal_ring {
            landmarks.push(ideal + offset, ideal + offset);
        }
        landmarks
    }

    #[inline]
    pub fn push(&mut self, source: DVec3, target: DVec3) {
        self.sources.push(source);
        self.targets.push(target);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Warp applied to transition-layer points.
#[derive(Debug, Clone)]
pub enum TransitionWarp {
    /// Points pass through unchanged
    Identity,
    Spline(ThinPlateSpline),
}

impl TransitionWarp {
    #[inline]
    pub fn apply(&self, point: DVec3) -> DVec3 {
        match self {
            Self::Identity => point,
            Self::Spline(spline) => spline.transform(point),
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

/// Builds transition warps for one interpolation mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionBlender {
    mode: InterpolationMode,
    sigma: f64,
}

impl TransitionBlender {
    pub fn new(mode: InterpolationMode, sigma: f64) -> Self {
        Self { mode, sigma }
    }

    #[inline]
    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    /// Fits the warp for `landmarks`. Linear mode never fails.
    pub fn fit(&self, landmarks: &LandmarkSet) -> Result<TransitionWarp, TransitionError> {
        match self.mode {
            InterpolationMode::Linear => Ok(TransitionWarp::Identity),
            InterpolationMode::ThinPlateSpline => {
                ThinPlateSpline::fit(&landmarks.sources, &landmarks.targets, self.sigma)
                    .map(TransitionWarp::Spline)
            }
        }
    }
}
