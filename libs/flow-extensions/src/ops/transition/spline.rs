//! # Thin-Plate Spline
//!
//! Landmark-driven 3D warp `f(p) = a + A p + Σ wᵢ U(|p - sᵢ| / σ)` with the
//! `U(r) = r² ln r` basis. The spline maps every source landmark exactly onto
//! its target and bends as little as possible in between.
//!
//! Landmarks are centered on their source centroid before solving, which
//! keeps the polynomial block well scaled for surfaces far from the origin.

use crate::error::TransitionError;
use config::constants::{LANDMARK_TOLERANCE, SPLINE_SOLVE_EPSILON};
use glam::DVec3;
use nalgebra::DMatrix;

/// Smallest landmark count that determines the affine part.
pub const MIN_LANDMARKS: usize = 4;

/// `r² ln r`, continuous at zero.
#[inline]
pub fn r2_log_r(r: f64) -> f64 {
    if r < 1e-10 {
        0.0
    } else {
        r * r * r.ln()
    }
}

/// Fitted thin-plate spline.
#[derive(Debug, Clone)]
pub struct ThinPlateSpline {
    /// Source landmarks, relative to `origin`
    sources: Vec<DVec3>,
    origin: DVec3,
    sigma: f64,
    /// One row per landmark, then constant and linear rows
    weights: DMatrix<f64>,
}

impl ThinPlateSpline {
    /// Fits the spline mapping `sources[i]` onto `targets[i]`.
    ///
    /// Fails when the lists differ in length, when there are fewer than
    /// [`MIN_LANDMARKS`] pairs, or when the landmark configuration is
    /// degenerate (duplicate or coplanar sources).
    pub fn fit(sources: &[DVec3], targets: &[DVec3], sigma: f64) -> Result<Self, TransitionError> {
        if sources.len() != targets.len() {
            return Err(TransitionError::LandmarkCountMismatch {
                sources: sources.len(),
                targets: targets.len(),
            });
        }
        if sources.len() < MIN_LANDMARKS {
            return Err(TransitionError::TooFewLandmarks {
                count: sources.len(),
            });
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(TransitionError::InvalidSigma { sigma });
        }

        let n = sources.len();
        let origin = sources.iter().copied().sum::<DVec3>() / n as f64;
        let sources: Vec<DVec3> = sources.iter().map(|&s| s - origin).collect();

        // [K P; Pᵀ 0] with K = U(|sᵢ - sⱼ| / σ) and P = [1 x y z]
        let size = n + 4;
        let mut matrix = DMatrix::<f64>::zeros(size, size);
        for i in 0..n {
            for j in (i + 1)..n {
                let k = r2_log_r(sources[i].distance(sources[j]) / sigma);
                matrix[(i, j)] = k;
                matrix[(j, i)] = k;
            }
            let p = sources[i];
            for (column, value) in [1.0, p.x, p.y, p.z].into_iter().enumerate() {
                matrix[(i, n + column)] = value;
                matrix[(n + column, i)] = value;
            }
        }

        let mut rhs = DMatrix::<f64>::zeros(size, 3);
        for (i, &t) in targets.iter().enumerate() {
            let t = t - origin;
            rhs[(i, 0)] = t.x;
            rhs[(i, 1)] = t.y;
            rhs[(i, 2)] = t.z;
        }

        let svd = matrix.svd(true, true);
        let largest = svd.singular_values.max();
        let smallest = svd.singular_values.min();
        if !(largest > 0.0) || smallest <= SPLINE_SOLVE_EPSILON * largest {
            return Err(TransitionError::SingularSystem {
                message: format!("condition estimate {largest:e} / {smallest:e}"),
            });
        }

        let weights = svd
            .solve(&rhs, SPLINE_SOLVE_EPSILON * largest)
            .map_err(|e| TransitionError::SingularSystem {
                message: e.to_string(),
            })?;
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(TransitionError::SingularSystem {
                message: "non-finite spline weights".to_string(),
            });
        }

        let spline = Self {
            sources,
            origin,
            sigma,
            weights,
        };

        // Ill-conditioned systems solve without error but miss their landmarks
        let extent = spline
            .sources
            .iter()
            .map(|s| s.length())
            .fold(1.0, f64::max);
        let residual = spline
            .sources
            .iter()
            .zip(targets)
            .map(|(&s, &t)| spline.transform(s + origin).distance(t))
            .fold(0.0, f64::max);
        if residual > LANDMARK_TOLERANCE * extent {
            return Err(TransitionError::SingularSystem {
                message: format!("landmark residual {residual:e}"),
            });
        }

        Ok(spline)
    }

    #[inline]
    pub fn landmark_count(&self) -> usize {
        self.sources.len()
    }

    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Maps `point` through the spline.
    pub fn transform(&self, point: DVec3) -> DVec3 {
        let n = self.sources.len();
        let p = point - self.origin;
        let w = &self.weights;

        let row = |i: usize| DVec3::new(w[(i, 0)], w[(i, 1)], w[(i, 2)]);

        let mut result = row(n) + row(n + 1) * p.x + row(n + 2) * p.y + row(n + 3) * p.z;
        for (i, &source) in self.sources.iter().enumerate() {
            result += row(i) * r2_log_r(p.distance(source) / self.sigma);
        }

        result + self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube_corners() -> Vec<DVec3> {
        let mut corners = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    corners.push(DVec3::new(x, y, z));
                }
            }
        }
        corners
    }

    #[test]
    fn test_basis_at_zero_and_one() {
        assert_eq!(r2_log_r(0.0), 0.0);
        assert_relative_eq!(r2_log_r(1.0), 0.0, epsilon = 1e-15);
        let r: f64 = 2.0;
        assert_relative_eq!(r2_log_r(r), 4.0 * r.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_identity_landmarks_give_identity_warp() {
        let corners = cube_corners();
        let spline = ThinPlateSpline::fit(&corners, &corners, 1.0).unwrap();
        let probe = DVec3::new(0.3, 0.7, 0.2);
        assert!(spline.transform(probe).distance(probe) < 1e-9);
    }

    #[test]
    fn test_translation_is_reproduced_everywhere() {
        let sources = cube_corners();
        let offset = DVec3::new(1.0, -2.0, 0.5);
        let targets: Vec<DVec3> = sources.iter().map(|&s| s + offset).collect();
        let spline = ThinPlateSpline::fit(&sources, &targets, 1.0).unwrap();

        for probe in [DVec3::ZERO, DVec3::splat(0.5), DVec3::new(3.0, 1.0, -2.0)] {
            assert!(spline.transform(probe).distance(probe + offset) < 1e-9);
        }
    }

    #[test]
    fn test_landmarks_are_interpolated() {
        let sources = cube_corners();
        let mut targets = sources.clone();
        targets[0] += DVec3::new(0.1, 0.05, -0.1);
        targets[5] += DVec3::new(-0.2, 0.0, 0.1);

        let spline = ThinPlateSpline::fit(&sources, &targets, 1.0).unwrap();
        assert_eq!(spline.landmark_count(), 8);
        for (s, t) in sources.iter().zip(&targets) {
            let mapped = spline.transform(*s);
            assert_relative_eq!(mapped.x, t.x, epsilon = 1e-9);
            assert_relative_eq!(mapped.y, t.y, epsilon = 1e-9);
            assert_relative_eq!(mapped.z, t.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_far_from_origin_landmarks() {
        let shift = DVec3::new(250.0, -400.0, 1000.0);
        let sources: Vec<DVec3> = cube_corners().into_iter().map(|c| c + shift).collect();
        let mut targets = sources.clone();
        targets[3] += DVec3::new(0.0, 0.1, 0.0);

        let spline = ThinPlateSpline::fit(&sources, &targets, 1.0).unwrap();
        assert!(spline.transform(sources[3]).distance(targets[3]) < 1e-7);
        assert!(spline.transform(sources[6]).distance(targets[6]) < 1e-7);
    }

    #[test]
    fn test_mismatched_landmarks_rejected() {
        let corners = cube_corners();
        let result = ThinPlateSpline::fit(&corners, &corners[..7], 1.0);
        assert_eq!(
            result.unwrap_err(),
            TransitionError::LandmarkCountMismatch {
                sources: 8,
                targets: 7
            }
        );
    }

    #[test]
    fn test_too_few_landmarks_rejected() {
        let points = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let result = ThinPlateSpline::fit(&points, &points, 1.0);
        assert_eq!(
            result.unwrap_err(),
            TransitionError::TooFewLandmarks { count: 3 }
        );
    }

    #[test]
    fn test_invalid_sigma_rejected() {
        let corners = cube_corners();
        let result = ThinPlateSpline::fit(&corners, &corners, 0.0);
        assert!(matches!(result, Err(TransitionError::InvalidSigma { .. })));
    }

    #[test]
    fn test_coplanar_sources_are_singular() {
        let sources: Vec<DVec3> = (0..6)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / 6.0;
                DVec3::new(angle.cos(), angle.sin(), 0.0)
            })
            .collect();
        let result = ThinPlateSpline::fit(&sources, &sources, 1.0);
        assert!(matches!(result, Err(TransitionError::SingularSystem { .. })));
    }

    #[test]
    fn test_duplicate_sources_are_singular() {
        let mut sources = cube_corners();
        sources.push(sources[2]);
        let mut targets = sources.clone();
        targets[8] += DVec3::X;
        let result = ThinPlateSpline::fit(&sources, &targets, 1.0);
        assert!(matches!(result, Err(TransitionError::SingularSystem { .. })));
    }
}
