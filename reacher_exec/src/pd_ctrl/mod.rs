//! # PD control module
//!
//! PdCtrl turns a measured error into an incremental joint angle demand for
//! the two-link arm. Two independent control laws are provided:
//!
//! - End-effector (task-space) control, which takes the end-effector position
//!   error and maps the PD correction into joint space through the transpose
//!   of the arm Jacobian.
//! - Joint (joint-space) control, which applies the PD correction directly to
//!   the joint angle error.
//!
//! Each law keeps its own record of the previous error for the derivative
//! term, so calling one never affects the other. The derivative term assumes
//! a stationary target, i.e. zero reference velocity.
//!
//! The Jacobian transpose is used rather than an inverse or pseudo-inverse.
//! It has no singularities but does not preserve the exact magnitude or
//! direction of the task-space correction when the Jacobian is poorly
//! conditioned.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_end_effector;
mod calc_joint;
mod gain;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
pub use gain::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during PdCtrl operation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PdCtrlError {
    #[error("Time step must be finite and strictly positive, found {0}")]
    InvalidTimeStep(f64),

    #[error("Expected a Jacobian of at least 2x2, found {rows}x{cols}")]
    JacobianTooSmall { rows: usize, cols: usize },
}

/// The two control laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Task-space control on the end-effector position error.
    EndEffector,

    /// Joint-space control on the joint angle error.
    Joint,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Proportional and derivative contributions of one control step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PdTerms {
    pub p: Vector2<f64>,
    pub d: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Reject time steps the derivative term cannot be divided by.
pub(crate) fn check_time_step(dt_s: f64) -> Result<(), PdCtrlError> {
    if dt_s.is_finite() && dt_s > 0.0 {
        Ok(())
    } else {
        Err(PdCtrlError::InvalidTimeStep(dt_s))
    }
}

/// Compute the P and D terms for an error given the previous error.
///
/// The derivative is a backward difference of the negated error, which is
/// the error rate when the reference is not moving.
pub(crate) fn calc_pd_terms(
    kp: &Gain,
    kd: &Gain,
    err: &Vector2<f64>,
    prev_err: &Vector2<f64>,
    dt_s: f64,
) -> PdTerms {
    let d_input = -(err - prev_err) / dt_s;

    PdTerms {
        p: kp.apply(err),
        d: kd.apply(&d_input),
    }
}
