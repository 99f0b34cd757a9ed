//! # Flow Extensions Filter
//!
//! Extends every open boundary of a vascular surface with a cylindrical
//! tube, so inlets and outlets have developed flow before reaching the
//! region of interest.
//!
//! ## Pipeline
//!
//! ```text
//! SurfaceMesh → boundaries → per boundary:
//!     frame → direction → profile → transition warp → layers
//! ```
//!
//! Configuration errors abort before any geometry is touched. A malformed
//! boundary, or one whose transition warp cannot be fitted, is logged and
//! skipped; earlier extensions stay in the output.

mod report;

#[cfg(test)]
mod tests;

pub use report::{BoundaryOutcome, BoundaryReport, ExtensionReport};

use crate::boundary::{extract_boundaries, BoundaryLoop};
use crate::centerline::Centerlines;
use crate::error::{BoundaryError, ExtensionError, ExtensionResult};
use crate::frame::ReferenceFrameBuilder;
use crate::mesh::SurfaceMesh;
use crate::ops::{
    extrude_boundary, ExtrusionDirectionEstimator, ExtrusionProfile, LandmarkSet, LayerCounts,
    TransitionBlender, TransitionWarp,
};
use crate::params::FlowExtensionParams;
use config::constants::{MAX_POINTS, MAX_POLYGONS};
use tracing::{debug, info, warn};

/// Extended surface and what happened to each boundary.
#[derive(Debug, Clone)]
pub struct FlowExtensionOutput {
    pub mesh: SurfaceMesh,
    pub report: ExtensionReport,
}

/// Adds flow extensions to the open boundaries of a surface.
///
/// # Example
///
/// ```rust
/// use flow_extensions::{ExtensionMode, FlowExtensionParams, FlowExtensionsFilter, SurfaceMesh};
/// use glam::DVec3;
///
/// // Square tube, open at z = 0 and z = -1
/// let mut mesh = SurfaceMesh::new();
/// for z in [0.0, -1.0] {
///     for (x, y) in [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)] {
///         mesh.add_point(DVec3::new(x, y, z));
///     }
/// }
/// for j in 0..4 {
///     let (a, b) = (j, (j + 1) % 4);
///     mesh.add_triangle(a, a + 4, b + 4);
///     mesh.add_triangle(a, b + 4, b);
/// }
///
/// let params = FlowExtensionParams {
///     extension_mode: ExtensionMode::UseNormalToBoundary,
///     extension_ratio: 2.0,
///     number_of_boundary_points: 8,
///     ..Default::default()
/// };
/// let output = FlowExtensionsFilter::new(params).apply(&mesh)?;
/// assert_eq!(output.report.extruded_count(), 2);
/// assert!(output.mesh.point_count() > mesh.point_count());
/// # Ok::<(), flow_extensions::ExtensionError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowExtensionsFilter {
    params: FlowExtensionParams,
    centerlines: Option<Centerlines>,
}

impl FlowExtensionsFilter {
    pub fn new(params: FlowExtensionParams) -> Self {
        Self {
            params,
            centerlines: None,
        }
    }

    /// Supplies the centerlines used by centerline direction mode.
    pub fn with_centerlines(mut self, centerlines: Centerlines) -> Self {
        self.centerlines = Some(centerlines);
        self
    }

    #[inline]
    pub fn params(&self) -> &FlowExtensionParams {
        &self.params
    }

    #[inline]
    pub fn centerlines(&self) -> Option<&Centerlines> {
        self.centerlines.as_ref()
    }

    /// Checks parameters and centerline availability without running.
    pub fn validate(&self) -> ExtensionResult<()> {
        self.params.validate()?;
        self.direction_estimator().map(|_| ())
    }

    /// Returns a copy of `input` with flow extensions appended.
    ///
    /// Input points and polygons keep their indices; extension points and
    /// triangles follow them, boundary by boundary in extraction order.
    pub fn apply(&self, input: &SurfaceMesh) -> ExtensionResult<FlowExtensionOutput> {
        self.params.validate()?;
        let estimator = self.direction_estimator()?;
        check_limits(input)?;
        check_point_ids(input)?;

        let blender = TransitionBlender::new(self.params.interpolation_mode, self.params.sigma);
        let frames = ReferenceFrameBuilder::new(input);
        let boundaries = extract_boundaries(input);
        debug!("Found {} boundaries", boundaries.len());

        let mut mesh = input.clone();
        let mut report = ExtensionReport::default();

        for (index, boundary) in boundaries.iter().enumerate() {
            if !self.params.selects(index) {
                report.push(index, BoundaryOutcome::NotSelected);
                continue;
            }
            let outcome =
                self.extend_boundary(&mut mesh, index, boundary, &frames, &estimator, &blender)?;
            report.push(index, outcome);
        }

        info!(
            "Extended {} of {} boundaries ({} skipped): {} points, {} triangles added",
            report.extruded_count(),
            boundaries.len(),
            report.skipped_count(),
            report.points_added(),
            report.triangles_added()
        );

        Ok(FlowExtensionOutput { mesh, report })
    }

    fn direction_estimator(&self) -> ExtensionResult<ExtrusionDirectionEstimator<'_>> {
        ExtrusionDirectionEstimator::new(
            self.params.extension_mode,
            self.centerlines.as_ref(),
            self.params.centerline_normal_estimation_distance_ratio,
        )
    }

    /// Runs one boundary through the pipeline. Only limit violations are
    /// returned as errors; boundary problems become `Skipped` outcomes.
    fn extend_boundary(
        &self,
        mesh: &mut SurfaceMesh,
        index: usize,
        boundary: &BoundaryLoop,
        frames: &ReferenceFrameBuilder<'_>,
        estimator: &ExtrusionDirectionEstimator<'_>,
        blender: &TransitionBlender,
    ) -> ExtensionResult<BoundaryOutcome> {
        if let Err(error) = boundary.validate(index) {
            return Ok(skip(error));
        }

        let frame = frames.build(boundary);
        let direction = estimator.estimate(&frame);
        let profile = ExtrusionProfile::build(&frame, direction, boundary.points(), &self.params);
        let length = self.params.extension_length_for(frame.mean_radius);
        let counts = LayerCounts::new(&profile, length, self.params.transition_ratio);

        debug!(
            "Boundary {}: {} points, barycenter {:?}, mean radius {:.4}, direction {:?}, {} layers ({} transition)",
            index,
            boundary.len(),
            frame.barycenter,
            frame.mean_radius,
            direction,
            counts.layers,
            counts.transition_layers
        );

        let warp = if counts.layers > 0 && counts.transition_layers > 0 {
            let landmarks = LandmarkSet::for_boundary(
                &profile.base_ring,
                boundary.points(),
                direction,
                length * self.params.transition_ratio,
            );
            match blender.fit(&landmarks) {
                Ok(warp) => warp,
                Err(source) => return Ok(skip(BoundaryError::Transition { index, source })),
            }
        } else {
            TransitionWarp::Identity
        };

        let summary = extrude_boundary(mesh, boundary.point_ids(), &profile, &warp, counts)?;
        Ok(BoundaryOutcome::Extruded(summary))
    }
}

fn skip(error: BoundaryError) -> BoundaryOutcome {
    warn!("Skipping boundary: {}", error);
    BoundaryOutcome::Skipped {
        reason: error.to_string(),
    }
}

fn check_limits(mesh: &SurfaceMesh) -> ExtensionResult<()> {
    if mesh.point_count() > MAX_POINTS {
        return Err(ExtensionError::TooManyPoints {
            count: mesh.point_count(),
            max: MAX_POINTS,
        });
    }
    if mesh.polygon_count() > MAX_POLYGONS {
        return Err(ExtensionError::TooManyPolygons {
            count: mesh.polygon_count(),
            max: MAX_POLYGONS,
        });
    }
    Ok(())
}

fn check_point_ids(mesh: &SurfaceMesh) -> ExtensionResult<()> {
    let point_count = mesh.point_count();
    for (polygon_id, polygon) in mesh.polygons().iter().enumerate() {
        if let Some(&point_id) = polygon.iter().find(|&&id| id as usize >= point_count) {
            return Err(ExtensionError::invalid_parameter(
                "polygons",
                format!("polygon {polygon_id} references point {point_id} of {point_count}"),
            ));
        }
    }
    Ok(())
}
