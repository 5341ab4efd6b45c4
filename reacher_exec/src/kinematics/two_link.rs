//! Planar two-link arm kinematics

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{DMatrix, Vector2};
use serde::{Deserialize, Serialize};

// Internal
use super::{JointAngles, Kinematics, KinematicsError, Params};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Targets closer to the base than this have no defined heading.
///
/// Units: meters
const MIN_TARGET_DISTANCE_M: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A planar arm with two revolute joints about the z axis.
///
/// The first joint sits at the origin, the second at the end of the first
/// link. Both angles are measured anticlockwise, `q1` relative to the first
/// link.
#[derive(Debug, Clone, Default)]
pub struct TwoLinkArm {
    params: Params,
}

/// The result of an inverse kinematics calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IkSolution {
    /// Joint angles placing the end-effector on the (possibly clamped) target.
    pub angles: JointAngles,

    /// True if the target was outside the reachable workspace and was moved
    /// onto its boundary.
    pub clamped: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which of the two mirror-image solutions inverse kinematics returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElbowConfig {
    /// Elbow joint angle is zero or negative.
    Up,

    /// Elbow joint angle is zero or positive.
    Down,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TwoLinkArm {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Maximum distance of the end-effector from the base.
    ///
    /// Units: meters
    pub fn max_reach_m(&self) -> f64 {
        self.params.link_0_length_m + self.params.link_1_length_m
    }

    /// Minimum distance of the end-effector from the base.
    ///
    /// Units: meters
    pub fn min_reach_m(&self) -> f64 {
        (self.params.link_0_length_m - self.params.link_1_length_m).abs()
    }

    /// Position of the end-effector in the base frame.
    pub fn forward(&self, q: JointAngles) -> Vector2<f64> {
        let l0 = self.params.link_0_length_m;
        let l1 = self.params.link_1_length_m;
        let q01 = q.q0_rad + q.q1_rad;

        Vector2::new(
            l0 * q.q0_rad.cos() + l1 * q01.cos(),
            l0 * q.q0_rad.sin() + l1 * q01.sin(),
        )
    }

    /// Find the joint angles which place the end-effector at `target_m`.
    ///
    /// Targets outside the reachable annulus are scaled along their direction
    /// from the base onto the nearest boundary of the workspace, and the
    /// solution is flagged as clamped.
    pub fn inverse(
        &self,
        target_m: &Vector2<f64>,
        elbow: ElbowConfig,
    ) -> Result<IkSolution, KinematicsError> {
        let l0 = self.params.link_0_length_m;
        let l1 = self.params.link_1_length_m;

        let mut target_m = *target_m;
        let mut clamped = false;
        let mut dist_m = target_m.norm();

        if dist_m < MIN_TARGET_DISTANCE_M {
            return Err(KinematicsError::Singular(target_m[0], target_m[1]));
        }

        // Limit target distance to be within range of arm
        if dist_m > self.max_reach_m() {
            target_m *= self.max_reach_m() / dist_m;
            dist_m = self.max_reach_m();
            clamped = true;
        } else if dist_m < self.min_reach_m() {
            target_m *= self.min_reach_m() / dist_m;
            dist_m = self.min_reach_m();
            clamped = true;
        }

        // Law of cosines for the elbow, clamped against rounding at the
        // workspace boundary
        let cos_q1 = clamp(
            (dist_m.powi(2) - l0.powi(2) - l1.powi(2)) / (2.0 * l0 * l1),
            -1.0,
            1.0,
        );
        let q1_rad = match elbow {
            ElbowConfig::Up => -cos_q1.acos(),
            ElbowConfig::Down => cos_q1.acos(),
        };

        let q0_rad = target_m[1].atan2(target_m[0])
            - (l1 * q1_rad.sin()).atan2(l0 + l1 * q1_rad.cos());

        trace!(
            "IK for ({:.4}, {:.4}): q0 = {:.4}, q1 = {:.4}, clamped = {}",
            target_m[0],
            target_m[1],
            q0_rad,
            q1_rad,
            clamped
        );

        Ok(IkSolution {
            angles: JointAngles::new(q0_rad, q1_rad),
            clamped,
        })
    }
}

impl Kinematics for TwoLinkArm {
    /// Linear velocity Jacobian, with a third all-zero row for the z axis
    /// since the arm is planar.
    #[rustfmt::skip]
    fn jacobian(&self, q: JointAngles) -> DMatrix<f64> {
        let l0 = self.params.link_0_length_m;
        let l1 = self.params.link_1_length_m;
        let q01 = q.q0_rad + q.q1_rad;

        DMatrix::from_row_slice(3, 2, &[
            -l0 * q.q0_rad.sin() - l1 * q01.sin(), -l1 * q01.sin(),
             l0 * q.q0_rad.cos() + l1 * q01.cos(),  l1 * q01.cos(),
             0.0,                                    0.0,
        ])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn arm() -> TwoLinkArm {
        TwoLinkArm::new(Params::default())
    }

    #[test]
    fn test_forward() {
        let arm = arm();

        let p = arm.forward(JointAngles::new(0.0, 0.0));
        assert!((p - Vector2::new(0.21, 0.0)).norm() < 1e-12);

        let p = arm.forward(JointAngles::new(FRAC_PI_2, -FRAC_PI_2));
        assert!((p - Vector2::new(0.11, 0.1)).norm() < 1e-12);
    }

    #[test]
    fn test_jacobian_matches_finite_difference() {
        let arm = arm();
        let q = JointAngles::new(0.3, -1.1);
        let h = 1e-7;

        let jac = arm.jacobian(q);
        assert_eq!((jac.nrows(), jac.ncols()), (3, 2));

        let p = arm.forward(q);
        let dp_dq0 = (arm.forward(JointAngles::new(q.q0_rad + h, q.q1_rad)) - p) / h;
        let dp_dq1 = (arm.forward(JointAngles::new(q.q0_rad, q.q1_rad + h)) - p) / h;

        for row in 0..2 {
            assert!((jac[(row, 0)] - dp_dq0[row]).abs() < 1e-6);
            assert!((jac[(row, 1)] - dp_dq1[row]).abs() < 1e-6);
        }
        assert_eq!(jac[(2, 0)], 0.0);
        assert_eq!(jac[(2, 1)], 0.0);
    }

    #[test]
    fn test_inverse_reaches_target() -> Result<(), KinematicsError> {
        let arm = arm();
        let target = Vector2::new(0.05, 0.12);

        let up = arm.inverse(&target, ElbowConfig::Up)?;
        let down = arm.inverse(&target, ElbowConfig::Down)?;

        assert!(!up.clamped);
        assert!(!down.clamped);
        assert!(up.angles.q1_rad <= 0.0);
        assert!(down.angles.q1_rad >= 0.0);
        assert!((arm.forward(up.angles) - target).norm() < 1e-12);
        assert!((arm.forward(down.angles) - target).norm() < 1e-12);

        Ok(())
    }

    #[test]
    fn test_inverse_clamps_unreachable_target() -> Result<(), KinematicsError> {
        let arm = arm();

        // Too far away, arm stretches out straight towards the target
        let far = arm.inverse(&Vector2::new(0.0, 1.0), ElbowConfig::Down)?;
        assert!(far.clamped);
        assert!(far.angles.q1_rad.abs() < 1e-6);
        assert!((arm.forward(far.angles) - Vector2::new(0.0, 0.21)).norm() < 1e-6);

        // Too close, arm folds back on itself
        let near = arm.inverse(&Vector2::new(0.001, 0.0), ElbowConfig::Down)?;
        assert!(near.clamped);
        assert!((arm.forward(near.angles).norm() - arm.min_reach_m()).abs() < 1e-6);

        Ok(())
    }

    #[test]
    fn test_inverse_at_base_is_singular() {
        let arm = arm();

        assert!(matches!(
            arm.inverse(&Vector2::zeros(), ElbowConfig::Up),
            Err(KinematicsError::Singular(_, _))
        ));
    }
}
