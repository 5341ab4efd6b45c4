//! # Kinematic reacher simulation
//!
//! A minimal stand-in for the reacher environment: joint angle increments are
//! applied directly to the arm with no dynamics. It provides the errors the
//! control laws consume, measured against a fixed end-effector target.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, warn};
use nalgebra::Vector2;

use crate::kinematics::{ElbowConfig, JointAngles, KinematicsError, TwoLinkArm};
use util::maths::{get_ang_dist, wrap_to_pi};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated arm state and target.
#[derive(Debug, Clone)]
pub struct ReacherSim {
    arm: TwoLinkArm,

    /// Current joint angles, each wrapped into [-pi, pi)
    q: JointAngles,

    /// End-effector target in the base frame
    ///
    /// Units: meters
    target_m: Vector2<f64>,

    /// Joint angles which reach the target, used for joint-space errors
    target_q: JointAngles,

    /// True if the requested target was out of reach and has been moved onto
    /// the workspace boundary
    target_clamped: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Cannot solve for the target joint angles: {0}")]
    TargetIkError(#[from] KinematicsError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ReacherSim {
    /// Create a new simulation with the arm at `initial_q` and the given target.
    ///
    /// `elbow` selects which inverse kinematics solution defines the joint
    /// target.
    pub fn new(
        arm: TwoLinkArm,
        initial_q: JointAngles,
        target_m: Vector2<f64>,
        elbow: ElbowConfig,
    ) -> Result<Self, SimError> {
        let ik = arm.inverse(&target_m, elbow)?;

        if ik.clamped {
            warn!(
                "Target ({:.4}, {:.4}) m is out of reach, moved to ({:.4}, {:.4}) m",
                target_m[0],
                target_m[1],
                arm.forward(ik.angles)[0],
                arm.forward(ik.angles)[1]
            );
        }

        let reachable_target_m = arm.forward(ik.angles);

        debug!(
            "Joint target: q0 = {:.4} rad, q1 = {:.4} rad",
            ik.angles.q0_rad, ik.angles.q1_rad
        );

        Ok(Self {
            arm,
            q: wrap(initial_q),
            target_m: if ik.clamped { reachable_target_m } else { target_m },
            target_q: ik.angles,
            target_clamped: ik.clamped,
        })
    }

    pub fn arm(&self) -> &TwoLinkArm {
        &self.arm
    }

    pub fn q(&self) -> JointAngles {
        self.q
    }

    pub fn target_m(&self) -> &Vector2<f64> {
        &self.target_m
    }

    pub fn target_q(&self) -> JointAngles {
        self.target_q
    }

    pub fn target_clamped(&self) -> bool {
        self.target_clamped
    }

    /// Current end-effector position.
    pub fn end_effector_m(&self) -> Vector2<f64> {
        self.arm.forward(self.q)
    }

    /// End-effector position error, target - actual.
    pub fn state_err(&self) -> Vector2<f64> {
        self.target_m - self.end_effector_m()
    }

    /// Joint angle error, target - actual, taking the short way round.
    pub fn q_err(&self) -> Vector2<f64> {
        Vector2::new(
            get_ang_dist(self.q.q0_rad, self.target_q.q0_rad),
            get_ang_dist(self.q.q1_rad, self.target_q.q1_rad),
        )
    }

    /// Apply a joint angle increment.
    pub fn apply(&mut self, q_delta: &Vector2<f64>) {
        self.q = wrap(JointAngles::new(
            self.q.q0_rad + q_delta[0],
            self.q.q1_rad + q_delta[1],
        ));
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn wrap(q: JointAngles) -> JointAngles {
    JointAngles::new(wrap_to_pi(q.q0_rad), wrap_to_pi(q.q1_rad))
}
