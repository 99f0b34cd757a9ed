//! # Config Crate
//!
//! Centralized configuration constants for the flow extension pipeline.
//! Filter defaults, numerical tolerances and safety limits are defined here
//! so the geometry crate never scatters literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, DEFAULT_NUMBER_OF_BOUNDARY_POINTS};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! let is_zero = value.abs() < EPSILON;
//! assert!(is_zero);
//!
//! // Ring resolution used when the caller does not override it
//! assert!(DEFAULT_NUMBER_OF_BOUNDARY_POINTS >= 3);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Filter Compatible**: Defaults match the established flow extension filter
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
