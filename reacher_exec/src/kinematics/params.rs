//! Parameters structure for the two-link kinematic model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Geometry of the two-link arm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Length of the first (shoulder to elbow) link.
    ///
    /// Units: meters.
    pub link_0_length_m: f64,

    /// Length of the second (elbow to fingertip) link.
    ///
    /// Units: meters.
    pub link_1_length_m: f64,
}

impl Default for Params {
    /// Link lengths of the standard reacher environment.
    fn default() -> Self {
        Self {
            link_0_length_m: 0.1,
            link_1_length_m: 0.11,
        }
    }
}
