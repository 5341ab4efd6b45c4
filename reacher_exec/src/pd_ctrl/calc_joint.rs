//! Joint-space PD control law

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use super::*;
use crate::kinematics::Kinematics;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<K: Kinematics> PdCtrl<K> {
    /// PD control on the joint angle error.
    ///
    /// # Inputs
    /// - `q_err`: joint angle error (target - actual), radians.
    /// - `dt_s`: time since the previous joint control call, seconds.
    ///
    /// # Outputs
    /// The joint angle increment to add to the current joint angles.
    ///
    /// Only the joint error register is updated, the end-effector register
    /// is left untouched. On error no state is modified.
    pub fn pd_control_joint(
        &mut self,
        q_err: &Vector2<f64>,
        dt_s: f64,
    ) -> Result<Vector2<f64>, PdCtrlError> {
        check_time_step(dt_s)?;

        let terms = calc_pd_terms(
            &self.params.kp,
            &self.params.kd,
            q_err,
            &self.q_err_memory,
            dt_s,
        );

        // Update register
        self.q_err_memory = *q_err;
        self.set_report(ControlMode::Joint, &terms);

        Ok(terms.p + terms.d)
    }
}
