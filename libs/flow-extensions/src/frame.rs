//! # Boundary Reference Frames
//!
//! Barycenter, mean radius, plane normal and outward normal of a boundary
//! loop.
//!
//! The plane normal follows the loop's own turning sense: seen from the tip
//! of the normal the loop runs clockwise. The outward normal is the plane
//! normal flipped, when needed, to point away from the surface the loop
//! bounds.

use crate::boundary::BoundaryLoop;
use crate::mesh::SurfaceMesh;
use config::constants::EPSILON;
use glam::DVec3;
use std::collections::HashSet;
use tracing::warn;

/// Rotation sense of the ideal rings relative to the extrusion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOrientation {
    /// Plane normal points into the surface; rings rotate positively.
    Natural,
    /// Plane normal already points outward; rings rotate negatively.
    Flipped,
}

impl BoundaryOrientation {
    /// Returns +1.0 or -1.0.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Natural => 1.0,
            Self::Flipped => -1.0,
        }
    }
}

/// Local frame of one boundary loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    pub barycenter: DVec3,
    pub mean_radius: f64,
    /// Unit normal of the best-fit boundary plane
    pub plane_normal: DVec3,
    /// Unit normal pointing away from the surface
    pub outward_normal: DVec3,
    pub orientation: BoundaryOrientation,
}

/// Builds reference frames for the boundaries of one surface.
///
/// Holds the point-to-polygon incidence of the surface so outward
/// orientation does not rescan the polygon list for every boundary.
#[derive(Debug)]
pub struct ReferenceFrameBuilder<'a> {
    mesh: &'a SurfaceMesh,
    point_cells: Vec<Vec<usize>>,
}

impl<'a> ReferenceFrameBuilder<'a> {
    pub fn new(mesh: &'a SurfaceMesh) -> Self {
        Self {
            mesh,
            point_cells: mesh.point_cells(),
        }
    }

    /// Computes the frame of `boundary`.
    pub fn build(&self, boundary: &BoundaryLoop) -> ReferenceFrame {
        let points = boundary.points();
        let barycenter = barycenter(points);
        let mean_radius = mean_radius(points, barycenter);
        let plane_normal = boundary_normal(points, barycenter);
        let outward_normal = self.orient_outward(boundary, plane_normal);

        let orientation = if plane_normal.dot(outward_normal) > 0.0 {
            BoundaryOrientation::Flipped
        } else {
            BoundaryOrientation::Natural
        };

        ReferenceFrame {
            barycenter,
            mean_radius,
            plane_normal,
            outward_normal,
            orientation,
        }
    }

    /// Orients `normal` away from the surface adjacent to `boundary`.
    ///
    /// Every polygon touching the boundary votes with the unit vectors from
    /// its interior points to the boundary point it shares.
    pub fn orient_outward(&self, boundary: &BoundaryLoop, normal: DVec3) -> DVec3 {
        let on_boundary: HashSet<u32> = boundary.point_ids().iter().copied().collect();
        let mut outward = DVec3::ZERO;

        for &id in boundary.point_ids() {
            let boundary_point = self.mesh.point(id);
            let Some(cells) = self.point_cells.get(id as usize) else {
                continue;
            };
            for &cell in cells {
                for &neighbor in self.mesh.polygon(cell) {
                    if on_boundary.contains(&neighbor) {
                        continue;
                    }
                    outward += (boundary_point - self.mesh.point(neighbor)).normalize_or_zero();
                }
            }
        }

        if normal.dot(outward) < 0.0 {
            -normal
        } else {
            normal
        }
    }
}

/// Arithmetic mean of `points`.
pub fn barycenter(points: &[DVec3]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }
    points.iter().copied().sum::<DVec3>() / points.len() as f64
}

/// Mean distance of `points` from `barycenter`.
pub fn mean_radius(points: &[DVec3], barycenter: DVec3) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.distance(barycenter)).sum::<f64>() / points.len() as f64
}

/// Unit normal of the boundary plane, oriented so the loop runs clockwise
/// seen from its tip. Falls back to +Z for degenerate (collinear) loops.
pub fn boundary_normal(points: &[DVec3], barycenter: DVec3) -> DVec3 {
    let n = points.len();
    let mut sum = DVec3::ZERO;
    for i in 0..n {
        let previous = points[(i + n - 1) % n] - barycenter;
        let current = points[i] - barycenter;
        sum += current.cross(previous);
    }

    let length = sum.length();
    if length < EPSILON {
        warn!("Degenerate boundary plane, falling back to +Z normal");
        return DVec3::Z;
    }
    sum / length
}
