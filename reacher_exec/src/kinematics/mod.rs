//! # Kinematics module
//!
//! Provides the differential kinematics used by the task-space control law.
//! Anything implementing [`Kinematics`] can be plugged into `PdCtrl`,
//! including plain closures of the joint angles, which is how tests and
//! external simulators supply a Jacobian. [`TwoLinkArm`] is the reference
//! provider for a planar two-link reacher.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod two_link;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

// Internal
pub use params::*;
pub use two_link::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Joint configuration of the arm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    /// Central (shoulder) joint angle.
    ///
    /// Units: radians
    pub q0_rad: f64,

    /// Elbow joint angle, relative to the first link.
    ///
    /// Units: radians
    pub q1_rad: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during kinematics calculations.
#[derive(Debug, thiserror::Error)]
pub enum KinematicsError {
    #[error("Target ({0}, {1}) has no unique joint solution, the arm is at a singularity")]
    Singular(f64, f64),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of the arm's Jacobian.
pub trait Kinematics {
    /// Compute the Jacobian relating joint angle rates to end-effector
    /// velocity at the given configuration.
    ///
    /// The matrix must be at least 2x2. Rows are end-effector axes (x then y)
    /// and columns are joints (q0 then q1), any further rows or columns are
    /// ignored by the controllers.
    fn jacobian(&self, q: JointAngles) -> DMatrix<f64>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointAngles {
    pub fn new(q0_rad: f64, q1_rad: f64) -> Self {
        Self { q0_rad, q1_rad }
    }
}

impl<F> Kinematics for F
where
    F: Fn(f64, f64) -> DMatrix<f64>,
{
    fn jacobian(&self, q: JointAngles) -> DMatrix<f64> {
        self(q.q0_rad, q.q1_rad)
    }
}
