//! # Extrusion Direction
//!
//! Chooses the unit vector along which a boundary is extruded: either the
//! outward boundary normal, or the centerline tangent averaged over a
//! neighborhood of the boundary barycenter's projection.
//!
//! ## Centerline Tangent
//!
//! 1. Project the barycenter onto the nearest centerline branch
//! 2. Walk backward and forward along the branch until the accumulated
//!    arclength exceeds `mean_radius * distance_ratio`
//! 3. Sum the two anchor-to-projection vectors, skipping negligible ones
//! 4. Orient the result away from the surface

use crate::centerline::{CenterlineProjection, Centerlines};
use crate::error::{ExtensionError, ExtensionResult};
use crate::frame::ReferenceFrame;
use crate::params::ExtensionMode;
use config::constants::{CENTERLINE_TOLERANCE_FACTOR, EPSILON};
use glam::DVec3;
use tracing::warn;

/// Direction of an arclength walk along a centerline branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Towards the branch start
    Backward,
    /// Towards the branch end
    Forward,
}

impl Walk {
    /// Vertex adjacent to the projection on this side of its segment.
    fn first_vertex(self, segment_index: usize) -> usize {
        match self {
            Self::Backward => segment_index,
            Self::Forward => segment_index + 1,
        }
    }

    fn step(self, vertex: usize, count: usize) -> Option<usize> {
        match self {
            Self::Backward => vertex.checked_sub(1),
            Self::Forward => (vertex + 1 < count).then_some(vertex + 1),
        }
    }
}

/// Walks from the projection along `branch` until the accumulated arclength
/// exceeds `limit`, returning the vertex reached.
///
/// The walk starts at the segment vertex on the `walk` side of the
/// projection, counting the distance to it. That vertex is never itself the
/// anchor unless it is the branch end. Running off the branch returns the
/// branch end on that side.
pub fn walk_anchor(
    branch: &[DVec3],
    projection: &CenterlineProjection,
    walk: Walk,
    limit: f64,
) -> usize {
    let mut vertex = walk.first_vertex(projection.segment_index);
    let mut abscissa = projection.point.distance(branch[vertex]);

    while let Some(next) = walk.step(vertex, branch.len()) {
        abscissa += branch[vertex].distance(branch[next]);
        vertex = next;
        if abscissa > limit {
            break;
        }
    }

    vertex
}

/// Estimates extrusion directions for one filter run.
#[derive(Debug, Clone, Copy)]
pub struct ExtrusionDirectionEstimator<'a> {
    mode: ExtensionMode,
    centerlines: Option<&'a Centerlines>,
    distance_ratio: f64,
}

impl<'a> ExtrusionDirectionEstimator<'a> {
    /// Creates an estimator, failing when centerline mode has nothing to
    /// project onto.
    pub fn new(
        mode: ExtensionMode,
        centerlines: Option<&'a Centerlines>,
        distance_ratio: f64,
    ) -> ExtensionResult<Self> {
        if mode == ExtensionMode::UseCenterlineDirection {
            let centerlines = centerlines.ok_or(ExtensionError::MissingCenterlines)?;
            if centerlines.segment_count() == 0 {
                return Err(ExtensionError::EmptyCenterlines);
            }
        }
        Ok(Self {
            mode,
            centerlines,
            distance_ratio,
        })
    }

    /// Unit extrusion direction for the boundary with `frame`.
    pub fn estimate(&self, frame: &ReferenceFrame) -> DVec3 {
        match (self.mode, self.centerlines) {
            (ExtensionMode::UseCenterlineDirection, Some(centerlines)) => {
                self.centerline_direction(centerlines, frame)
            }
            _ => frame.outward_normal,
        }
    }

    fn centerline_direction(&self, centerlines: &Centerlines, frame: &ReferenceFrame) -> DVec3 {
        let Some(projection) = centerlines.project(frame.barycenter) else {
            warn!("No centerline segment to project on, using the boundary normal");
            return frame.outward_normal;
        };

        let branch = centerlines.branch(projection.branch_id);
        let limit = frame.mean_radius * self.distance_ratio;
        let before = branch[walk_anchor(branch, &projection, Walk::Backward, limit)];
        let after = branch[walk_anchor(branch, &projection, Walk::Forward, limit)];

        let tolerance = CENTERLINE_TOLERANCE_FACTOR * frame.mean_radius;
        let mut tangent = DVec3::ZERO;
        if after.distance(projection.point) > tolerance {
            tangent += after - projection.point;
        }
        if projection.point.distance(before) > tolerance {
            tangent += projection.point - before;
        }

        if tangent.length() < EPSILON {
            warn!(
                "Degenerate centerline tangent near {:?}, using the boundary normal",
                frame.barycenter
            );
            return frame.outward_normal;
        }
        let tangent = tangent.normalize();

        if frame.outward_normal.dot(tangent) < 0.0 {
            -tangent
        } else {
            tangent
        }
    }
}
