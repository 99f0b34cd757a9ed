//! # Boundary Extraction
//!
//! Finds the open boundary loops of a surface mesh. A boundary edge is an
//! edge used by exactly one polygon; boundary edges are chained into loops.
//!
//! Loops are walked on the hole side: each boundary edge is traversed
//! opposite to the polygon that owns it. Triangles stitched to a loop in
//! increasing loop order therefore wind consistently with the surface.

use crate::error::BoundaryError;
use crate::mesh::SurfaceMesh;
use glam::DVec3;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// An ordered boundary polyline of a surface mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLoop {
    /// Point ids into the source mesh, in loop order
    point_ids: Vec<u32>,
    /// Coordinates of `point_ids`
    points: Vec<DVec3>,
    /// Whether the chain returned to its first point
    closed: bool,
}

impl BoundaryLoop {
    /// Creates a loop from ids and their coordinates.
    pub fn new(point_ids: Vec<u32>, points: Vec<DVec3>, closed: bool) -> Self {
        debug_assert_eq!(point_ids.len(), points.len());
        Self {
            point_ids,
            points,
            closed,
        }
    }

    /// Creates a closed loop by looking the ids up in `mesh`.
    pub fn from_ids(mesh: &SurfaceMesh, point_ids: Vec<u32>) -> Self {
        let points = point_ids.iter().map(|&id| mesh.point(id)).collect();
        Self::new(point_ids, points, true)
    }

    /// Number of points (and edges, when closed) in the loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.point_ids.len()
    }

    /// Returns true if the loop has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.point_ids.is_empty()
    }

    #[inline]
    pub fn point_ids(&self) -> &[u32] {
        &self.point_ids
    }

    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Checks that the loop is a simple closed polyline with at least three
    /// points. `index` is the loop's extraction index, used in the error.
    pub fn validate(&self, index: usize) -> Result<(), BoundaryError> {
        if !self.closed {
            return Err(BoundaryError::NotClosed { index });
        }
        if self.point_ids.len() < 3 {
            return Err(BoundaryError::TooFewPoints {
                index,
                count: self.point_ids.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.point_ids.len());
        for &id in &self.point_ids {
            if !seen.insert(id) {
                return Err(BoundaryError::RepeatedPoint {
                    index,
                    point_id: id,
                });
            }
        }
        Ok(())
    }
}

/// Extracts every boundary loop of `mesh`.
///
/// Loops are reported in order of first appearance of their edges in the
/// polygon list, so the extraction index of a loop is stable for a given
/// mesh. Chains that dead-end or branch are reported with
/// `is_closed() == false` rather than dropped.
///
/// # Example
///
/// ```rust
/// use flow_extensions::{boundary::extract_boundaries, SurfaceMesh};
/// use glam::DVec3;
///
/// let mut mesh = SurfaceMesh::new();
/// mesh.add_point(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_point(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_point(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
///
/// let loops = extract_boundaries(&mesh);
/// assert_eq!(loops.len(), 1);
/// assert_eq!(loops[0].point_ids(), &[1, 0, 2]);
/// ```
pub fn extract_boundaries(mesh: &SurfaceMesh) -> Vec<BoundaryLoop> {
    let edge_counts = mesh.edge_use_counts();

    // Boundary half-edges, reversed relative to their polygon
    let mut half_edges: Vec<(u32, u32)> = Vec::new();
    for polygon in mesh.polygons() {
        let n = polygon.len();
        for i in 0..n {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            if edge_counts.get(&(a.min(b), a.max(b))) == Some(&1) {
                half_edges.push((b, a));
            }
        }
    }

    if half_edges.is_empty() {
        return Vec::new();
    }

    debug!("Found {} boundary edges", half_edges.len());

    let mut outgoing: HashMap<u32, Vec<usize>> = HashMap::new();
    for (edge_id, &(from, _)) in half_edges.iter().enumerate() {
        outgoing.entry(from).or_default().push(edge_id);
    }

    let mut used = vec![false; half_edges.len()];
    let mut loops = Vec::new();

    for start_edge in 0..half_edges.len() {
        if used[start_edge] {
            continue;
        }

        let (start, mut current) = half_edges[start_edge];
        used[start_edge] = true;
        let mut ids = vec![start];
        let mut closed = false;
        let mut branched = false;

        loop {
            if current == start {
                closed = !branched;
                break;
            }
            ids.push(current);

            let candidates = outgoing.get(&current).map(Vec::as_slice).unwrap_or(&[]);
            if candidates.len() > 1 {
                warn!("Boundary point {} is shared by several boundary chains", current);
                branched = true;
            }

            match candidates.iter().copied().find(|&edge_id| !used[edge_id]) {
                Some(edge_id) => {
                    used[edge_id] = true;
                    current = half_edges[edge_id].1;
                }
                None => {
                    warn!("Boundary chain starting at point {} is not closed", start);
                    break;
                }
            }
        }

        let points = ids.iter().map(|&id| mesh.point(id)).collect();
        loops.push(BoundaryLoop::new(ids, points, closed));
    }

    debug!(
        "Extracted {} boundaries, sizes: {:?}",
        loops.len(),
        loops.iter().map(BoundaryLoop::len).collect::<Vec<_>>()
    );

    loops
}
