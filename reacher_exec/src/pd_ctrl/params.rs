//! Parameters structure for PdCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::Gain;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for PD control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Proportional gain
    pub kp: Gain,

    /// Derivative gain
    pub kd: Gain,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            kp: Gain::Scalar(1.0),
            kd: Gain::Scalar(10.0),
        }
    }
}
