//! Implementations for the PdCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{ControlMode, Gain, Params, PdCtrlError};
use crate::kinematics::{JointAngles, Kinematics};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// PD control module state
///
/// Holds the gains, the kinematics used by the end-effector law and one
/// previous-error register per control law.
#[derive(Debug, Clone)]
pub struct PdCtrl<K> {
    pub(crate) params: Params,

    pub(crate) kinematics: K,

    /// End-effector error seen on the previous end-effector control call.
    pub(crate) state_err_memory: Vector2<f64>,

    /// Joint error seen on the previous joint control call.
    pub(crate) q_err_memory: Vector2<f64>,

    pub(crate) report: StatusReport,
}

/// Status report for PdCtrl processing.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StatusReport {
    /// The law run on the last call, or `None` if nothing has run yet.
    pub mode: Option<ControlMode>,

    /// Proportional term of the last call, in the frame of the error.
    pub p_term: [f64; 2],

    /// Derivative term of the last call, in the frame of the error.
    pub d_term: [f64; 2],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Input data to PD control, selecting which law to run this cycle.
#[derive(Debug, Clone, Copy)]
pub enum ControlDemand {
    /// Run the end-effector law.
    EndEffector {
        /// End-effector position error (target - actual).
        ///
        /// Units: meters
        state_err: Vector2<f64>,

        /// Current joint angles
        q: JointAngles,

        /// Time step since the previous cycle
        ///
        /// Units: seconds
        dt_s: f64,
    },

    /// Run the joint law.
    Joint {
        /// Joint angle error (target - actual).
        ///
        /// Units: radians
        q_err: Vector2<f64>,

        /// Time step since the previous cycle
        ///
        /// Units: seconds
        dt_s: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<K: Kinematics> PdCtrl<K> {
    /// Create a new controller with the given gains.
    ///
    /// Both error registers start at zero.
    pub fn new(params: Params, kinematics: K) -> Self {
        debug!("PdCtrl gains: Kp = {}, Kd = {}", params.kp, params.kd);

        Self {
            params,
            kinematics,
            state_err_memory: Vector2::zeros(),
            q_err_memory: Vector2::zeros(),
            report: StatusReport::default(),
        }
    }

    /// Create a new controller from individual gains.
    pub fn with_gains<P, D>(kp: P, kd: D, kinematics: K) -> Self
    where
        P: Into<Gain>,
        D: Into<Gain>,
    {
        Self::new(
            Params {
                kp: kp.into(),
                kd: kd.into(),
            },
            kinematics,
        )
    }

    /// Create a new controller with the default gains, Kp = 1 and Kd = 10.
    pub fn with_default_gains(kinematics: K) -> Self {
        Self::new(Params::default(), kinematics)
    }

    /// Clear both error registers, as if no control call had been made.
    pub fn reset(&mut self) {
        self.state_err_memory = Vector2::zeros();
        self.q_err_memory = Vector2::zeros();
        self.report = StatusReport::default();
    }

    pub fn kp(&self) -> &Gain {
        &self.params.kp
    }

    pub fn kd(&self) -> &Gain {
        &self.params.kd
    }

    pub fn kinematics(&self) -> &K {
        &self.kinematics
    }

    /// The end-effector error remembered for the next derivative calculation.
    pub fn state_err_memory(&self) -> &Vector2<f64> {
        &self.state_err_memory
    }

    /// The joint error remembered for the next derivative calculation.
    pub fn q_err_memory(&self) -> &Vector2<f64> {
        &self.q_err_memory
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    pub(crate) fn set_report(&mut self, mode: ControlMode, terms: &super::PdTerms) {
        self.report = StatusReport {
            mode: Some(mode),
            p_term: [terms.p[0], terms.p[1]],
            d_term: [terms.d[0], terms.d[1]],
        };
    }
}

impl<K: Kinematics> State for PdCtrl<K> {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = ControlDemand;
    type OutputData = Vector2<f64>;
    type StatusReport = StatusReport;
    type ProcError = PdCtrlError;

    /// Initialise the PdCtrl module.
    ///
    /// Expected init data is the path to the parameter file. Any previous
    /// error history is discarded.
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        self.params = params::load(init_data)?;
        self.reset();

        info!(
            "PdCtrl gains loaded from {}: Kp = {}, Kd = {}",
            init_data, self.params.kp, self.params.kd
        );

        Ok(())
    }

    /// Perform cyclic processing of PD control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let q_delta = match *input_data {
            ControlDemand::EndEffector { state_err, q, dt_s } => {
                self.pd_control_end_effector(&state_err, q, dt_s)?
            }
            ControlDemand::Joint { q_err, dt_s } => self.pd_control_joint(&q_err, dt_s)?,
        };

        debug!(
            "PdCtrl {:?}: P = {:?}, D = {:?}, q_delta = [{:.6}, {:.6}]",
            self.report.mode, self.report.p_term, self.report.d_term, q_delta[0], q_delta[1]
        );

        Ok((q_delta, self.report))
    }
}
