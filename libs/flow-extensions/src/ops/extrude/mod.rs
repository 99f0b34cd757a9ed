//! # Extension Extrusion
//!
//! Appends the layers of one flow extension to a surface mesh:
//! - each layer is an ideal ring translated along the extrusion direction
//! - transition layers are passed through the boundary's warp
//! - consecutive rings are stitched with 2n triangles, starting from the
//!   native boundary points so the extension shares its seam with the input
//!
//! Base and staggered rings alternate, so each quad strip is split along the
//! diagonal that keeps the triangles closest to equilateral.


use super::profile::{ExtrusionProfile, RingVariant};
use super::transition::TransitionWarp;
use crate::error::{ExtensionError, ExtensionResult};
use crate::mesh::SurfaceMesh;
use config::constants::{MAX_POINTS, MAX_POLYGONS};
use serde::Serialize;

/// Layer counts of one extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerCounts {
    pub layers: usize,
    /// Leading layers that receive the transition warp
    pub transition_layers: usize,
}

impl LayerCounts {
    /// Whole layers of `profile.spacing` in the extension and transition
    /// lengths.
    pub fn new(profile: &ExtrusionProfile, extension_length: f64, transition_ratio: f64) -> Self {
        Self {
            layers: profile.layer_count(extension_length),
            transition_layers: profile.layer_count(extension_length * transition_ratio),
        }
    }
}

/// What one extrusion added to the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtrusionSummary {
    pub layers: usize,
    pub transition_layers: usize,
    pub points_added: usize,
    pub triangles_added: usize,
}

/// Extrudes the boundary with `native_ids` by `counts.layers` layers.
///
/// `native_ids` must be in boundary loop order, with one ring point per id.
/// Fails without touching `mesh` when the result would exceed the point or
/// polygon limits.
pub fn extrude_boundary(
    mesh: &mut SurfaceMesh,
    native_ids: &[u32],
    profile: &ExtrusionProfile,
    warp: &TransitionWarp,
    counts: LayerCounts,
) -> ExtensionResult<ExtrusionSummary> {
    let n = native_ids.len();
    // Saturated totals always exceed the limits
    let new_points = counts.layers.saturating_mul(n);
    let new_triangles = new_points.saturating_mul(2);

    let point_total = mesh.point_count().saturating_add(new_points);
    if point_total > MAX_POINTS {
        return Err(ExtensionError::TooManyPoints {
            count: point_total,
            max: MAX_POINTS,
        });
    }
    let polygon_total = mesh.polygon_count().saturating_add(new_triangles);
    if polygon_total > MAX_POLYGONS {
        return Err(ExtensionError::TooManyPolygons {
            count: polygon_total,
            max: MAX_POLYGONS,
        });
    }

    mesh.reserve(new_points, new_triangles);

    let mut previous: Vec<u32> = native_ids.to_vec();
    let mut current: Vec<u32> = Vec::with_capacity(n);

    for layer in 0..counts.layers {
        let variant = RingVariant::for_layer(layer);
        let offset = profile.direction * ((layer + 1) as f64 * profile.spacing);
        let warped = layer < counts.transition_layers;

        current.clear();
        for &ring_point in profile.ring(variant) {
            let point = ring_point + offset;
            let point = if warped { warp.apply(point) } else { point };
            current.push(mesh.add_point(point));
        }

        stitch_layers(mesh, &previous, &current, variant);
        std::mem::swap(&mut previous, &mut current);
    }

    Ok(ExtrusionSummary {
        layers: counts.layers,
        transition_layers: counts.transition_layers.min(counts.layers),
        points_added: new_points,
        triangles_added: new_triangles,
    })
}

/// Emits the 2n triangles between the `previous` and `current` rings.
fn stitch_layers(
    mesh: &mut SurfaceMesh,
    previous: &[u32],
    current: &[u32],
    variant: RingVariant,
) {
    let n = current.len();
    for j in 0..n {
        let before = (j + n - 1) % n;
        let (c, c_before) = (current[j], current[before]);
        let (p, p_before) = (previous[j], previous[before]);

        match variant {
            RingVariant::Base => {
                mesh.add_triangle(c, c_before, p_before);
                mesh.add_triangle(p, c, p_before);
            }
            RingVariant::Staggered => {
                mesh.add_triangle(c, c_before, p);
                mesh.add_triangle(p, c_before, p_before);
            }
        }
    }
}
