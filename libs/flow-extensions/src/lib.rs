//! # Flow Extensions
//!
//! Cylindrical extensions for the open boundaries (inlets and outlets) of
//! vascular surface meshes, used to give CFD inflow and outflow sections a
//! regular, developed shape.
//!
//! ## Architecture
//!
//! ```text
//! SurfaceMesh → boundary → frame → ops::direction → ops::profile
//!             → ops::transition → ops::extrude → SurfaceMesh + ExtensionReport
//! ```
//!
//! ## Algorithms
//!
//! - **Boundaries**: chains of edges used by a single polygon
//! - **Direction**: outward boundary normal, or the centerline tangent
//!   averaged over an arclength window
//! - **Profile**: alternating base and half-step staggered circular rings
//! - **Transition**: thin-plate spline warp from the ideal ring onto the
//!   native boundary, fading out over the transition length
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flow_extensions::{Centerlines, FlowExtensionParams, FlowExtensionsFilter};
//!
//! let filter = FlowExtensionsFilter::new(FlowExtensionParams::default())
//!     .with_centerlines(Centerlines::new(branches));
//! let output = filter.apply(&surface)?;
//! ```

pub mod boundary;
pub mod centerline;
pub mod error;
pub mod filter;
pub mod frame;
pub mod mesh;
pub mod ops;
pub mod params;

#[cfg(test)]
mod testing;

pub use centerline::{CenterlineProjection, Centerlines};
pub use error::{BoundaryError, ExtensionError, ExtensionResult, TransitionError};
pub use filter::{BoundaryOutcome, ExtensionReport, FlowExtensionOutput, FlowExtensionsFilter};
pub use mesh::SurfaceMesh;
pub use params::{ExtensionMode, FlowExtensionParams, InterpolationMode};
