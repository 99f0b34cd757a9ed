//! # Extension Operations
//!
//! Per-boundary stages of a flow extension, run in order by the filter:
//! direction estimation, radial profile, transition warp and extrusion.

pub mod direction;
pub mod extrude;
pub mod profile;
pub mod transition;

pub use direction::{walk_anchor, ExtrusionDirectionEstimator, Walk};
pub use extrude::{extrude_boundary, ExtrusionSummary, LayerCounts};
pub use profile::{ExtrusionProfile, RingVariant};
pub use transition::{LandmarkSet, ThinPlateSpline, TransitionBlender, TransitionWarp};
