//! # Radial Profile
//!
//! Builds the ideal circular cross-section of an extension: a base ring of
//! equally spaced points around the boundary barycenter, and a staggered
//! twin rotated by half the angular step. Layers alternate between the two
//! so successive quad strips use opposite diagonals.

use crate::frame::ReferenceFrame;
use crate::params::FlowExtensionParams;
use config::constants::{approx_zero, EPSILON};
use glam::{DQuat, DVec3};
use std::f64::consts::TAU;

/// Which ideal ring a layer is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingVariant {
    Base,
    Staggered,
}

impl RingVariant {
    /// Odd layers use the base ring, even layers the staggered one.
    #[inline]
    pub fn for_layer(layer: usize) -> Self {
        if layer % 2 != 0 {
            Self::Base
        } else {
            Self::Staggered
        }
    }
}

/// Ideal cross-section and layer spacing of one extension.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionProfile {
    /// Unit extrusion direction
    pub direction: DVec3,
    pub target_radius: f64,
    /// Distance between consecutive layers
    pub spacing: f64,
    pub base_ring: Vec<DVec3>,
    pub staggered_ring: Vec<DVec3>,
}

impl ExtrusionProfile {
    /// Builds the rings for a boundary with `frame`, extruded along
    /// `direction`.
    ///
    /// Rings have one point per native boundary point. The base ring starts
    /// at the in-plane projection of the first native point and turns with
    /// the boundary's orientation.
    pub fn build(
        frame: &ReferenceFrame,
        direction: DVec3,
        boundary_points: &[DVec3],
        params: &FlowExtensionParams,
    ) -> Self {
        let target_radius = if params.adaptive_extension_radius {
            in_plane_mean_radius(boundary_points, frame.barycenter, direction)
        } else {
            params.extension_radius
        };
        let spacing = params.layer_spacing(target_radius);

        let first = boundary_points.first().copied().unwrap_or(frame.barycenter);
        let radial = in_plane(first - frame.barycenter, direction);
        let radial = if approx_zero(radial.length()) {
            direction.any_orthonormal_vector()
        } else {
            radial.normalize()
        } * target_radius;

        let n = boundary_points.len();
        let step = frame.orientation.sign() * TAU / n as f64;
        let ring_point = |turns: f64| {
            frame.barycenter + DQuat::from_axis_angle(direction, turns * step) * radial
        };

        let base_ring = (0..n).map(|j| ring_point(j as f64)).collect();
        let staggered_ring = (0..n).map(|j| ring_point(j as f64 + 0.5)).collect();

        Self {
            direction,
            target_radius,
            spacing,
            base_ring,
            staggered_ring,
        }
    }

    /// Ring points for `variant`, before translation.
    #[inline]
    pub fn ring(&self, variant: RingVariant) -> &[DVec3] {
        match variant {
            RingVariant::Base => &self.base_ring,
            RingVariant::Staggered => &self.staggered_ring,
        }
    }

    /// Number of points per ring.
    #[inline]
    pub fn ring_size(&self) -> usize {
        self.base_ring.len()
    }

    /// Number of whole layers that fit in `length`.
    pub fn layer_count(&self, length: f64) -> usize {
        if self.spacing < EPSILON {
            return 0;
        }
        (length / self.spacing).floor() as usize
    }
}

/// Removes the component of `vector` along the unit `axis`.
#[inline]
fn in_plane(vector: DVec3, axis: DVec3) -> DVec3 {
    vector - vector.dot(axis) * axis
}

/// Mean distance of `points` from `center`, measured orthogonally to `axis`.
pub fn in_plane_mean_radius(points: &[DVec3], center: DVec3, axis: DVec3) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points
        .iter()
        .map(|&p| in_plane(p - center, axis).length())
        .sum::<f64>()
        / points.len() as f64
}
