//! Shared mesh fixtures for unit tests.

use crate::mesh::SurfaceMesh;
use glam::DVec3;
use std::f64::consts::TAU;

/// Open tube of `rings` circles of `segments` points around the Z axis.
///
/// Ring 0 lies at z = 0, the others step down to z = -height. Triangles
/// face radially outward, so the rim at z = 0 opens towards +Z.
pub fn open_cylinder(segments: u32, rings: u32, radius: f64, height: f64) -> SurfaceMesh {
    assert!(segments >= 3 && rings >= 2);
    let mut mesh = SurfaceMesh::with_capacity(
        (segments * rings) as usize,
        (2 * segments * (rings - 1)) as usize,
    );

    for k in 0..rings {
        let z = -height * k as f64 / (rings - 1) as f64;
        for p in circle(segments, radius) {
            mesh.add_point(DVec3::new(p.x, p.y, z));
        }
    }

    for k in 0..rings - 1 {
        for j in 0..segments {
            let a = k * segments + j;
            let b = k * segments + (j + 1) % segments;
            let c = (k + 1) * segments + (j + 1) % segments;
            let d = (k + 1) * segments + j;
            mesh.add_triangle(a, d, c);
            mesh.add_triangle(a, c, b);
        }
    }

    mesh
}

/// Counter-clockwise circle in the XY plane starting on +X.
pub fn circle(segments: u32, radius: f64) -> Vec<DVec3> {
    (0..segments)
        .map(|j| {
            let angle = TAU * j as f64 / segments as f64;
            DVec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
        })
        .collect()
}
