//! # Surface Mesh Data Structure
//!
//! Polygonal surface representation with points and polygon connectivity.

use config::constants::EPSILON;
use glam::DVec3;
use std::collections::HashMap;

/// A polygonal surface mesh with points and polygon index lists.
///
/// All geometry uses f64. Polygons are small ordered lists of point
/// indices; flow extensions only ever append triangles.
///
/// # Example
///
/// ```rust
/// use flow_extensions::SurfaceMesh;
/// use glam::DVec3;
///
/// let mut mesh = SurfaceMesh::new();
/// mesh.add_point(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_point(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_point(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.polygon_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Point positions
    points: Vec<DVec3>,
    /// Polygon point indices
    polygons: Vec<Vec<u32>>,
}

impl SurfaceMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            polygons: Vec::new(),
        }
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(point_count: usize, polygon_count: usize) -> Self {
        Self {
            points: Vec::with_capacity(point_count),
            polygons: Vec::with_capacity(polygon_count),
        }
    }

    /// Creates a mesh from existing point and polygon buffers.
    pub fn from_parts(points: Vec<DVec3>, polygons: Vec<Vec<u32>>) -> Self {
        Self { points, polygons }
    }

    /// Returns the number of points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the number of polygons.
    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Returns true if the mesh has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reserves room for additional points and polygons.
    pub fn reserve(&mut self, points: usize, polygons: usize) {
        self.points.reserve(points);
        self.polygons.reserve(polygons);
    }

    /// Adds a point and returns its index.
    pub fn add_point(&mut self, position: DVec3) -> u32 {
        let index = self.points.len() as u32;
        self.points.push(position);
        index
    }

    /// Adds a polygon by point indices and returns its index.
    pub fn add_polygon(&mut self, point_ids: Vec<u32>) -> usize {
        self.polygons.push(point_ids);
        self.polygons.len() - 1
    }

    /// Adds a triangle by point indices.
    pub fn add_triangle(&mut self, p0: u32, p1: u32, p2: u32) {
        self.polygons.push(vec![p0, p1, p2]);
    }

    /// Returns a reference to the points.
    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns a reference to the polygons.
    #[inline]
    pub fn polygons(&self) -> &[Vec<u32>] {
        &self.polygons
    }

    /// Returns the point at the given index.
    #[inline]
    pub fn point(&self, index: u32) -> DVec3 {
        self.points[index as usize]
    }

    /// Returns the polygon at the given index.
    #[inline]
    pub fn polygon(&self, index: usize) -> &[u32] {
        &self.polygons[index]
    }

    /// Builds the point-to-polygon incidence table.
    ///
    /// Entry `i` lists the polygons that reference point `i`.
    pub fn point_cells(&self) -> Vec<Vec<usize>> {
        let mut cells = vec![Vec::new(); self.points.len()];
        for (polygon_id, polygon) in self.polygons.iter().enumerate() {
            for &point_id in polygon {
                if let Some(entry) = cells.get_mut(point_id as usize) {
                    entry.push(polygon_id);
                }
            }
        }
        cells
    }

    /// Counts how many polygons use each undirected edge.
    ///
    /// Keys are `(min, max)` point index pairs.
    pub fn edge_use_counts(&self) -> HashMap<(u32, u32), usize> {
        let mut counts = HashMap::new();
        for polygon in &self.polygons {
            let n = polygon.len();
            for i in 0..n {
                let a = polygon[i];
                let b = polygon[(i + 1) % n];
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.points.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.points[0];
        let mut max = self.points[0];

        for p in &self.points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }

        (min, max)
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - Every polygon has at least 3 points
    /// - All polygon indices are valid
    /// - No polygon repeats a point
    /// - No zero-area triangles
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let point_count = self.points.len() as u32;

        for polygon in &self.polygons {
            if polygon.len() < 3 {
                return false;
            }

            if polygon.iter().any(|&id| id >= point_count) {
                return false;
            }

            for (i, id) in polygon.iter().enumerate() {
                if polygon[i + 1..].contains(id) {
                    return false;
                }
            }

            if polygon.len() == 3 {
                let p0 = self.points[polygon[0] as usize];
                let p1 = self.points[polygon[1] as usize];
                let p2 = self.points[polygon[2] as usize];
                let area = (p1 - p0).cross(p2 - p0).length();
                if area < EPSILON {
                    return false;
                }
            }
        }

        true
    }
}
