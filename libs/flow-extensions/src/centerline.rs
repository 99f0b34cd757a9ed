//! # Centerlines
//!
//! A bundle of centerline polylines (branches) with an optional radius per
//! point, and the nearest-branch projection used to estimate extrusion
//! directions.
//!
//! Projection treats the bundle as a union of tapered tubes ("poly-balls"):
//! each segment contributes the distance to its closest point minus the
//! interpolated radius there. With no radius field, or an all-zero one, this
//! is the plain nearest point on the centerlines.

use crate::error::{ExtensionError, ExtensionResult};
use config::constants::EPSILON;
use glam::DVec3;

/// Centerline polylines with an optional per-point radius field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Centerlines {
    branches: Vec<Vec<DVec3>>,
    radii: Option<Vec<Vec<f64>>>,
}

/// Result of projecting a point onto the nearest centerline branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterlineProjection {
    /// Index of the branch in the bundle
    pub branch_id: usize,
    /// Segment `[segment_index, segment_index + 1]` holding the projection
    pub segment_index: usize,
    /// Fractional position within the segment, in `[0, 1]`
    pub pcoord: f64,
    /// Projected point
    pub point: DVec3,
}

impl Centerlines {
    /// Creates a bundle without a radius field.
    pub fn new(branches: Vec<Vec<DVec3>>) -> Self {
        Self {
            branches,
            radii: None,
        }
    }

    /// Creates a bundle with one radius per centerline point.
    pub fn with_radii(branches: Vec<Vec<DVec3>>, radii: Vec<Vec<f64>>) -> ExtensionResult<Self> {
        let matches = branches.len() == radii.len()
            && branches.iter().zip(&radii).all(|(b, r)| b.len() == r.len());
        if !matches {
            return Err(ExtensionError::invalid_parameter(
                "centerline radii",
                "radius field must have one value per centerline point",
            ));
        }
        Ok(Self {
            branches,
            radii: Some(radii),
        })
    }

    #[inline]
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Points of branch `branch_id`.
    #[inline]
    pub fn branch(&self, branch_id: usize) -> &[DVec3] {
        &self.branches[branch_id]
    }

    /// Total number of segments over all branches.
    pub fn segment_count(&self) -> usize {
        self.branches
            .iter()
            .map(|branch| branch.len().saturating_sub(1))
            .sum()
    }

    fn radius(&self, branch_id: usize, point_id: usize) -> f64 {
        self.radii
            .as_ref()
            .map_or(0.0, |radii| radii[branch_id][point_id])
    }

    /// Projects `point` onto the nearest branch.
    ///
    /// Returns `None` when the bundle has no segment. Ties keep the first
    /// segment found.
    pub fn project(&self, point: DVec3) -> Option<CenterlineProjection> {
        let mut best: Option<(f64, CenterlineProjection)> = None;

        for (branch_id, branch) in self.branches.iter().enumerate() {
            for (segment_index, segment) in branch.windows(2).enumerate() {
                let (p0, p1) = (segment[0], segment[1]);
                let axis = p1 - p0;
                let length2 = axis.length_squared();
                let pcoord = if length2 < EPSILON {
                    0.0
                } else {
                    ((point - p0).dot(axis) / length2).clamp(0.0, 1.0)
                };
                let center = p0 + pcoord * axis;
                let r0 = self.radius(branch_id, segment_index);
                let r1 = self.radius(branch_id, segment_index + 1);
                let value = point.distance(center) - (r0 + pcoord * (r1 - r0));

                if best.map_or(true, |(best_value, _)| value < best_value) {
                    best = Some((
                        value,
                        CenterlineProjection {
                            branch_id,
                            segment_index,
                            pcoord,
                            point: center,
                        },
                    ));
                }
            }
        }

        best.map(|(_, projection)| projection)
    }
}
