//! # Reacher Executable Parameters
//!
//! This module provide parameters for the reacher executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use reacher_lib::{kinematics::ElbowConfig, pd_ctrl::ControlMode};
use util::logger::LogParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ReacherExecParams {
    /// The control law to run
    pub mode: ControlMode,

    /// Period of one control cycle, passed to the controller as its time step
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Maximum number of cycles to run before giving up on convergence
    pub max_num_cycles: u64,

    /// Initial joint angles, [q0, q1]
    ///
    /// Units: radians
    pub initial_q_rad: [f64; 2],

    /// End-effector target in the arm base frame, [x, y]
    ///
    /// Units: meters
    pub target_m: [f64; 2],

    /// Which inverse kinematics solution defines the joint target
    pub elbow: ElbowConfig,

    /// The run stops once the norm of the active error falls below this
    /// threshold. Units follow the mode: meters for end-effector, radians for
    /// joint.
    pub converged_threshold: f64,

    /// Log progress every this many cycles
    pub log_every_num_cycles: u64,

    /// Logging verbosity, defaults to `info` everywhere
    #[serde(default)]
    pub log: LogParams,
}
