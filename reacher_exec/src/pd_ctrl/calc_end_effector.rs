//! End-effector (task-space) PD control law

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{Matrix2, Vector2};

// Internal
use super::*;
use crate::kinematics::{JointAngles, Kinematics};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<K: Kinematics> PdCtrl<K> {
    /// PD control on the end-effector position error.
    ///
    /// The PD correction is computed in the frame of `state_err` and then
    /// mapped into joint space with the transpose of the Jacobian at `q`.
    ///
    /// # Inputs
    /// - `state_err`: end-effector position error (target - actual).
    /// - `q`: current joint angles, used to evaluate the Jacobian.
    /// - `dt_s`: time since the previous end-effector control call, seconds.
    ///
    /// # Outputs
    /// The joint angle increment to add to the current joint angles.
    ///
    /// Only the end-effector error register is updated, the joint register
    /// is left untouched. On error no state is modified.
    pub fn pd_control_end_effector(
        &mut self,
        state_err: &Vector2<f64>,
        q: JointAngles,
        dt_s: f64,
    ) -> Result<Vector2<f64>, PdCtrlError> {
        check_time_step(dt_s)?;

        // Evaluated before touching the register so a bad Jacobian leaves the
        // controller as it was
        let jac = self.calc_jacobian_2x2(q)?;

        let terms = calc_pd_terms(
            &self.params.kp,
            &self.params.kd,
            state_err,
            &self.state_err_memory,
            dt_s,
        );

        // Update register
        self.state_err_memory = *state_err;
        self.set_report(ControlMode::EndEffector, &terms);

        // Task-space correction mapped into joint space
        let state_delta = terms.p + terms.d;
        let q_delta = jac.transpose() * state_delta;

        trace!(
            "End-effector correction [{:.6}, {:.6}] -> q_delta [{:.6}, {:.6}]",
            state_delta[0],
            state_delta[1],
            q_delta[0],
            q_delta[1]
        );

        Ok(q_delta)
    }

    /// Get the upper-left 2x2 block of the Jacobian at the given angles.
    fn calc_jacobian_2x2(&self, q: JointAngles) -> Result<Matrix2<f64>, PdCtrlError> {
        let jac = self.kinematics.jacobian(q);

        if jac.nrows() < 2 || jac.ncols() < 2 {
            return Err(PdCtrlError::JacobianTooSmall {
                rows: jac.nrows(),
                cols: jac.ncols(),
            });
        }

        Ok(Matrix2::new(
            jac[(0, 0)], jac[(0, 1)],
            jac[(1, 0)], jac[(1, 1)],
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kinematics::TwoLinkArm;
    use nalgebra::DMatrix;

    /// A provider returning the same Jacobian everywhere.
    fn fixed_jacobian(rows: [[f64; 2]; 2]) -> impl Fn(f64, f64) -> DMatrix<f64> {
        move |_, _| DMatrix::from_row_slice(2, 2, &[rows[0][0], rows[0][1], rows[1][0], rows[1][1]])
    }

    #[test]
    fn test_fixed_jacobian_transpose() -> Result<(), PdCtrlError> {
        let mut c = PdCtrl::with_gains(1.0, 0.0, fixed_jacobian([[1.0, 2.0], [3.0, 4.0]]));

        let q_delta = c.pd_control_end_effector(&Vector2::new(1.0, 0.0), JointAngles::new(0.0, 0.0), 0.1)?;

        // Jt * [1, 0] is the first row of J, an inverse would give [-2, 1.5]
        assert_eq!(q_delta, Vector2::new(1.0, 2.0));
        assert_eq!(c.report().p_term, [1.0, 0.0]);
        assert_eq!(c.report().d_term, [0.0, 0.0]);

        Ok(())
    }

    #[test]
    fn test_reacher_at_zero_configuration() -> Result<(), PdCtrlError> {
        let arm = TwoLinkArm::default();
        let q = JointAngles::new(0.0, 0.0);
        let jac = arm.jacobian(q);
        let mut c = PdCtrl::with_gains(1.0, 0.0, arm);

        // Stretched out along x, so an error along x cannot be corrected
        let q_delta = c.pd_control_end_effector(&Vector2::new(1.0, 0.0), q, 0.1)?;
        assert_eq!(q_delta, Vector2::new(jac[(0, 0)], jac[(0, 1)]));
        assert_eq!(q_delta, Vector2::zeros());

        // An error along y swings both joints, each by its lever arm
        c.reset();
        let q_delta = c.pd_control_end_effector(&Vector2::new(0.0, 1.0), q, 0.1)?;
        assert!((q_delta - Vector2::new(0.21, 0.11)).norm() < 1e-12);

        Ok(())
    }

    #[test]
    fn test_single_step_derivative() -> Result<(), PdCtrlError> {
        let mut c = PdCtrl::with_gains(0.0, 1.0, fixed_jacobian([[1.0, 0.0], [0.0, 1.0]]));
        let (a, b) = (0.3, -1.7);

        let q_delta = c.pd_control_end_effector(&Vector2::new(a, b), JointAngles::default(), 1.0)?;

        assert_eq!(c.report().d_term, [-a, -b]);
        assert_eq!(q_delta, Vector2::new(-a, -b));
        assert_eq!(c.state_err_memory(), &Vector2::new(a, b));

        Ok(())
    }

    #[test]
    fn test_zero_error_is_fixed_point() -> Result<(), PdCtrlError> {
        let mut c = PdCtrl::with_default_gains(TwoLinkArm::default());

        for i in 0..10 {
            let q = JointAngles::new(0.1 * i as f64, -0.2 * i as f64);
            assert_eq!(c.pd_control_end_effector(&Vector2::zeros(), q, 0.01)?, Vector2::zeros());
        }

        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<(), PdCtrlError> {
        let mut c0 = PdCtrl::with_gains(2.0, 0.3, TwoLinkArm::default());
        let mut c1 = PdCtrl::with_gains(2.0, 0.3, TwoLinkArm::default());
        let q = JointAngles::new(0.4, 1.2);

        for err in &[Vector2::new(0.05, 0.01), Vector2::new(0.04, 0.0), Vector2::new(0.02, -0.01)] {
            let out0 = c0.pd_control_end_effector(err, q, 0.01)?;
            let out1 = c1.pd_control_end_effector(err, q, 0.01)?;
            assert_eq!(out0, out1);
        }

        Ok(())
    }

    #[test]
    fn test_scalar_and_matrix_gains_match() -> Result<(), PdCtrlError> {
        let mut scalar = PdCtrl::with_gains(1.0, 10.0, TwoLinkArm::default());
        let mut matrix = PdCtrl::with_gains(
            Matrix2::identity(),
            Matrix2::identity() * 10.0,
            TwoLinkArm::default(),
        );
        let q = JointAngles::new(-0.6, 0.8);

        for err in &[Vector2::new(0.05, 0.01), Vector2::new(0.03, 0.02)] {
            assert_eq!(
                scalar.pd_control_end_effector(err, q, 0.01)?,
                matrix.pd_control_end_effector(err, q, 0.01)?
            );
        }

        Ok(())
    }

    #[test]
    fn test_memory_isolation() -> Result<(), PdCtrlError> {
        let mut mixed = PdCtrl::with_default_gains(TwoLinkArm::default());
        let mut task_only = mixed.clone();
        let mut joint_only = mixed.clone();

        let q = JointAngles::new(0.5, 0.5);
        let state_err = Vector2::new(0.02, -0.03);
        let q_err = Vector2::new(1.0, -1.0);

        // Interleave the two laws on one controller and compare each against
        // a controller that only ever ran that law
        for _ in 0..3 {
            assert_eq!(
                mixed.pd_control_joint(&q_err, 0.01)?,
                joint_only.pd_control_joint(&q_err, 0.01)?
            );
            assert_eq!(
                mixed.pd_control_end_effector(&state_err, q, 0.01)?,
                task_only.pd_control_end_effector(&state_err, q, 0.01)?
            );
        }

        assert_eq!(mixed.state_err_memory(), &state_err);
        assert_eq!(mixed.q_err_memory(), &q_err);

        Ok(())
    }

    #[test]
    fn test_larger_jacobian_uses_upper_left_block() -> Result<(), PdCtrlError> {
        let mut c = PdCtrl::with_gains(1.0, 0.0, |_: f64, _: f64| {
            DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 9.0, 3.0, 4.0, 9.0, 9.0, 9.0, 9.0])
        });

        let q_delta = c.pd_control_end_effector(&Vector2::new(0.0, 1.0), JointAngles::default(), 0.1)?;

        assert_eq!(q_delta, Vector2::new(3.0, 4.0));

        Ok(())
    }

    #[test]
    fn test_small_jacobian_rejected() {
        let mut c = PdCtrl::with_gains(1.0, 1.0, |_: f64, _: f64| DMatrix::from_element(2, 1, 1.0));

        assert_eq!(
            c.pd_control_end_effector(&Vector2::new(1.0, 1.0), JointAngles::default(), 0.1),
            Err(PdCtrlError::JacobianTooSmall { rows: 2, cols: 1 })
        );
        assert_eq!(c.state_err_memory(), &Vector2::zeros());
    }

    #[test]
    fn test_invalid_time_step_leaves_state() {
        let mut c = PdCtrl::with_default_gains(TwoLinkArm::default());

        assert_eq!(
            c.pd_control_end_effector(&Vector2::new(1.0, 1.0), JointAngles::default(), 0.0),
            Err(PdCtrlError::InvalidTimeStep(0.0))
        );
        assert_eq!(c.state_err_memory(), &Vector2::zeros());
        assert_eq!(c.report().mode, None);
    }
}
