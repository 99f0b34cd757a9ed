//! # Flow Extensions Filter Tests
//!
//! End-to-end runs on open tubes.

use super::*;
use crate::boundary::extract_boundaries;
use crate::params::{ExtensionMode, InterpolationMode};
use crate::testing::open_cylinder;
use approx::assert_relative_eq;
use glam::DVec3;
use std::collections::HashSet;

/// Tube of 20 segments and radius 1, open at z = 0 and z = -2.
fn tube() -> SurfaceMesh {
    open_cylinder(20, 3, 1.0, 2.0)
}

fn normal_params() -> FlowExtensionParams {
    FlowExtensionParams {
        extension_mode: ExtensionMode::UseNormalToBoundary,
        number_of_boundary_points: 20,
        ..Default::default()
    }
}

fn spacing() -> f64 {
    2.0 * (std::f64::consts::PI / 20.0).sin()
}

fn assert_consistent_winding(mesh: &SurfaceMesh) {
    let mut directed = HashSet::new();
    for polygon in mesh.polygons() {
        for i in 0..polygon.len() {
            let edge = (polygon[i], polygon[(i + 1) % polygon.len()]);
            assert!(directed.insert(edge), "directed edge {edge:?} repeated");
        }
    }
}

#[test]
fn test_circular_boundary_scenario() {
    let input = tube();
    let output = FlowExtensionsFilter::new(normal_params()).apply(&input).unwrap();

    assert_eq!(output.report.extruded_count(), 2);
    for index in 0..2 {
        let Some(BoundaryOutcome::Extruded(summary)) = output.report.outcome(index) else {
            panic!("boundary {index} not extruded");
        };
        assert_eq!(summary.layers, 3);
        assert_eq!(summary.transition_layers, 1);
        assert_eq!(summary.points_added, 60);
        assert_eq!(summary.triangles_added, 120);
    }
    assert_eq!(output.mesh.point_count(), 60 + 120);
    assert_eq!(output.mesh.polygon_count(), 80 + 240);

    // Top extension is appended first; its last ring sits 3 layers above z = 0
    let last_ring = &output.mesh.points()[100..120];
    let center = last_ring.iter().copied().sum::<DVec3>() / 20.0;
    assert!(center.distance(DVec3::new(0.0, 0.0, 3.0 * spacing())) < 1e-9);

    // Bottom extension goes down from z = -2
    let bottom_ring = &output.mesh.points()[160..180];
    let center = bottom_ring.iter().copied().sum::<DVec3>() / 20.0;
    assert!(center.distance(DVec3::new(0.0, 0.0, -2.0 - 3.0 * spacing())) < 1e-9);
}

#[test]
fn test_input_is_preserved() {
    let input = tube();
    let output = FlowExtensionsFilter::new(normal_params()).apply(&input).unwrap();
    assert_eq!(&output.mesh.points()[..60], input.points());
    assert_eq!(&output.mesh.polygons()[..80], input.polygons());
}

#[test]
fn test_extended_surface_is_consistent() {
    let output = FlowExtensionsFilter::new(normal_params())
        .apply(&tube())
        .unwrap();
    assert_consistent_winding(&output.mesh);
    assert!(output.mesh.validate());

    // Still a tube: two rims, now at the far ends of the extensions
    let rims = extract_boundaries(&output.mesh);
    assert_eq!(rims.len(), 2);
    for rim in &rims {
        assert!(rim.points().iter().all(|p| p.z > 0.9 || p.z < -2.9));
    }
}

#[test]
fn test_inward_facing_surface_is_extended_consistently() {
    let input = tube();
    let reversed = input
        .polygons()
        .iter()
        .map(|polygon| polygon.iter().rev().copied().collect())
        .collect();
    let inverted = SurfaceMesh::from_parts(input.points().to_vec(), reversed);

    let output = FlowExtensionsFilter::new(normal_params())
        .apply(&inverted)
        .unwrap();
    assert_eq!(output.report.extruded_count(), 2);
    assert_consistent_winding(&output.mesh);

    let top_center = output.mesh.points()[100..120].iter().copied().sum::<DVec3>() / 20.0;
    assert_relative_eq!(top_center.z, 3.0 * spacing(), epsilon = 1e-9);
}

#[test]
fn test_circular_boundary_needs_no_warp() {
    let input = tube();
    let spline = FlowExtensionsFilter::new(normal_params()).apply(&input).unwrap();
    let linear = FlowExtensionsFilter::new(FlowExtensionParams {
        interpolation_mode: InterpolationMode::Linear,
        ..normal_params()
    })
    .apply(&input)
    .unwrap();

    assert_eq!(spline.mesh.polygons(), linear.mesh.polygons());
    for (a, b) in spline.mesh.points().iter().zip(linear.mesh.points()) {
        assert!(a.distance(*b) < 1e-8);
    }
}

#[test]
fn test_wavy_boundary_blends_into_circle() {
    // Push alternate points of the top rim out, so the rim is not circular
    let mut points = tube().points().to_vec();
    for (j, p) in points.iter_mut().take(20).enumerate() {
        if j % 2 == 1 {
            *p *= DVec3::new(1.2, 1.2, 1.0);
        }
    }
    let input = SurfaceMesh::from_parts(points, tube().polygons().to_vec());
    let params = FlowExtensionParams {
        extension_ratio: 2.0,
        ..normal_params()
    };
    let output = FlowExtensionsFilter::new(params).apply(&input).unwrap();

    let Some(BoundaryOutcome::Extruded(summary)) = output.report.outcome(0) else {
        panic!("top boundary not extruded");
    };
    assert!(summary.transition_layers > 0);

    // Past the transition the rings are circles around the axis
    let n = 20;
    let last = summary.layers - 1;
    let ring = &output.mesh.points()[60 + last * n..60 + (last + 1) * n];
    let radius = ring[0].truncate().length();
    for p in ring {
        assert_relative_eq!(p.truncate().length(), radius, epsilon = 1e-9);
    }
    // An early base layer still follows the wavy rim
    let second = &output.mesh.points()[60 + n..60 + 2 * n];
    let radii: Vec<f64> = second.iter().map(|p| p.truncate().length()).collect();
    let spread = radii.iter().copied().fold(f64::MIN, f64::max)
        - radii.iter().copied().fold(f64::MAX, f64::min);
    assert!(spread > 1e-3);
}

#[test]
fn test_boundary_subset_selection() {
    let params = FlowExtensionParams {
        boundary_ids: Some(vec![1]),
        ..normal_params()
    };
    let output = FlowExtensionsFilter::new(params).apply(&tube()).unwrap();

    assert_eq!(output.report.outcome(0), Some(&BoundaryOutcome::NotSelected));
    assert!(matches!(
        output.report.outcome(1),
        Some(BoundaryOutcome::Extruded(_))
    ));
    assert_eq!(output.mesh.point_count(), 120);
    assert!(output.mesh.points()[60..].iter().all(|p| p.z < -2.0));
}

#[test]
fn test_malformed_boundaries_are_skipped() {
    let mut input = tube();
    // Bowtie far away from the tube: both of its rims pass through point `hub`
    let offset = DVec3::new(10.0, 0.0, 0.0);
    let hub = input.add_point(offset);
    let a = input.add_point(offset + DVec3::new(1.0, 0.0, 0.0));
    let b = input.add_point(offset + DVec3::new(1.0, 1.0, 0.0));
    let c = input.add_point(offset + DVec3::new(-1.0, 0.0, 0.0));
    let d = input.add_point(offset + DVec3::new(-1.0, -1.0, 0.0));
    input.add_triangle(hub, a, b);
    input.add_triangle(hub, c, d);

    let output = FlowExtensionsFilter::new(normal_params()).apply(&input).unwrap();

    assert_eq!(output.report.boundaries.len(), 4);
    assert_eq!(output.report.extruded_count(), 2);
    assert_eq!(output.report.skipped_count(), 2);
    assert!(matches!(
        output.report.outcome(2),
        Some(BoundaryOutcome::Skipped { .. })
    ));
    assert_eq!(output.mesh.point_count(), input.point_count() + 120);
}

#[test]
fn test_zero_length_extension_adds_nothing() {
    let params = FlowExtensionParams {
        adaptive_extension_length: false,
        extension_length: 0.0,
        ..normal_params()
    };
    let input = tube();
    let output = FlowExtensionsFilter::new(params).apply(&input).unwrap();
    assert_eq!(output.mesh, input);
    assert_eq!(output.report.extruded_count(), 2);
    assert_eq!(output.report.points_added(), 0);
}

#[test]
fn test_fixed_length_and_radius() {
    let params = FlowExtensionParams {
        adaptive_extension_length: false,
        extension_length: 2.0,
        adaptive_extension_radius: false,
        extension_radius: 0.5,
        interpolation_mode: InterpolationMode::Linear,
        ..normal_params()
    };
    let output = FlowExtensionsFilter::new(params).apply(&tube()).unwrap();

    // Spacing follows the fixed radius: 2 sin(pi / 20) * 0.5
    let Some(BoundaryOutcome::Extruded(summary)) = output.report.outcome(0) else {
        panic!("top boundary not extruded");
    };
    assert_eq!(summary.layers, (2.0 / (0.5 * spacing())).floor() as usize);
    for p in &output.mesh.points()[60..80] {
        assert_relative_eq!(p.truncate().length(), 0.5, epsilon = 1e-12);
    }
}

#[test]
fn test_huge_extension_length_hits_point_limit() {
    let params = FlowExtensionParams {
        adaptive_extension_length: false,
        extension_length: 1e30,
        interpolation_mode: InterpolationMode::Linear,
        ..normal_params()
    };
    assert!(params.validate().is_ok());
    let result = FlowExtensionsFilter::new(params).apply(&tube());
    assert!(matches!(result, Err(ExtensionError::TooManyPoints { .. })));
}

#[test]
fn test_centerline_mode_matches_straight_axis() {
    let axis = (-20..=10).map(|i| DVec3::new(0.0, 0.0, i as f64 * 0.25)).collect();
    let params = FlowExtensionParams {
        extension_mode: ExtensionMode::UseCenterlineDirection,
        ..normal_params()
    };
    let filter = FlowExtensionsFilter::new(params).with_centerlines(Centerlines::new(vec![axis]));
    assert!(filter.centerlines().is_some());
    assert!(filter.validate().is_ok());

    let input = tube();
    let along_axis = filter.apply(&input).unwrap();
    let along_normal = FlowExtensionsFilter::new(normal_params()).apply(&input).unwrap();

    assert_eq!(along_axis.mesh.point_count(), along_normal.mesh.point_count());
    for (a, b) in along_axis.mesh.points().iter().zip(along_normal.mesh.points()) {
        assert!(a.distance(*b) < 1e-8);
    }
}

#[test]
fn test_tilted_centerline_tilts_extension() {
    let tilt = DVec3::new(0.2, 0.0, 1.0).normalize();
    let axis = (-10..=10).map(|i| tilt * i as f64 * 0.5).collect();
    let params = FlowExtensionParams {
        extension_mode: ExtensionMode::UseCenterlineDirection,
        interpolation_mode: InterpolationMode::Linear,
        adaptive_extension_radius: false,
        extension_radius: 1.0,
        boundary_ids: Some(vec![0]),
        ..normal_params()
    };
    let output = FlowExtensionsFilter::new(params)
        .with_centerlines(Centerlines::new(vec![axis]))
        .apply(&tube())
        .unwrap();

    let last_ring = &output.mesh.points()[100..120];
    let center = last_ring.iter().copied().sum::<DVec3>() / 20.0;
    let expected = tilt * 3.0 * spacing();
    assert!(center.distance(expected) < 1e-9);
}

#[test]
fn test_missing_centerlines_rejected() {
    let filter = FlowExtensionsFilter::new(FlowExtensionParams::default());
    assert!(matches!(
        filter.validate(),
        Err(ExtensionError::MissingCenterlines)
    ));
    assert!(matches!(
        filter.apply(&tube()),
        Err(ExtensionError::MissingCenterlines)
    ));
}

#[test]
fn test_invalid_parameters_rejected_before_geometry() {
    let params = FlowExtensionParams {
        number_of_boundary_points: 2,
        ..normal_params()
    };
    let result = FlowExtensionsFilter::new(params).apply(&tube());
    assert!(matches!(
        result,
        Err(ExtensionError::InvalidParameter {
            name: "number_of_boundary_points",
            ..
        })
    ));
}

#[test]
fn test_out_of_range_point_id_rejected() {
    let mut input = tube();
    input.add_triangle(0, 1, 99);
    let result = FlowExtensionsFilter::new(normal_params()).apply(&input);
    assert!(matches!(
        result,
        Err(ExtensionError::InvalidParameter {
            name: "polygons",
            ..
        })
    ));
}

#[test]
fn test_closed_surface_is_returned_unchanged() {
    let mesh = SurfaceMesh::from_parts(
        vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
        vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![0, 3, 2]],
    );
    let output = FlowExtensionsFilter::new(normal_params()).apply(&mesh).unwrap();
    assert_eq!(output.mesh, mesh);
    assert!(output.report.boundaries.is_empty());
}

#[test]
fn test_report_serializes() {
    let params = FlowExtensionParams {
        boundary_ids: Some(vec![0]),
        ..normal_params()
    };
    let output = FlowExtensionsFilter::new(params).apply(&tube()).unwrap();
    let json = serde_json::to_value(&output.report).unwrap();

    assert_eq!(json["boundaries"][0]["index"], 0);
    assert_eq!(json["boundaries"][0]["outcome"]["Extruded"]["layers"], 3);
    assert_eq!(json["boundaries"][1]["outcome"], "NotSelected");
}
