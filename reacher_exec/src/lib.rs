//! # Reacher library.
//!
//! This library allows other crates in the workspace, along with the
//! benchmarks, to access items defined inside the reacher crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Kinematics module - Jacobian providers and the two-link arm model
pub mod kinematics;

/// PD control module - converts end-effector or joint errors into joint angle increments
pub mod pd_ctrl;

/// Kinematic simulation of the reacher arm
pub mod sim;
