//! Main reacher executable entry point.
//!
//! Runs one of the PD control laws in closed loop against the kinematic
//! reacher simulation, starting from the configured joint angles, until the
//! error converges or the cycle limit is hit.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise session, logging, parameters and modules
//!     - Main loop:
//!         - Error measurement from the simulation
//!         - PdCtrl processing
//!         - Apply the joint demand to the simulation
//!         - Archive the cycle
//!     - Save a run summary
//!
//! Cycles run back to back rather than in real time, the configured cycle
//! period is only used as the controller's time step.
//!
//! # Usage
//!
//!     reacher_exec [joint|end_effector]
//!
//! The optional argument overrides the mode given in `reacher_exec.toml`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use nalgebra::Vector2;
use serde::Serialize;
use std::env;

// Internal
use params::ReacherExecParams;
use reacher_lib::{
    kinematics::{self, JointAngles, TwoLinkArm},
    pd_ctrl::{ControlDemand, ControlMode, Gain, PdCtrl},
    sim::ReacherSim,
};
use util::{
    archive::Archiver,
    logger::logger_init,
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One archived control cycle.
#[derive(Serialize)]
struct CycleRecord {
    cycle: u64,
    sim_time_s: f64,
    q0_rad: f64,
    q1_rad: f64,
    ee_x_m: f64,
    ee_y_m: f64,
    err_0: f64,
    err_1: f64,
    p_term_0: f64,
    p_term_1: f64,
    d_term_0: f64,
    d_term_1: f64,
    q_delta_0_rad: f64,
    q_delta_1_rad: f64,
}

/// Summary of the run, saved into the session directory at exit.
#[derive(Serialize)]
struct RunSummary {
    mode: ControlMode,
    kp: Gain,
    kd: Gain,
    num_cycles: u64,
    num_proc_errors: u64,
    converged: bool,
    final_err_norm: f64,
    final_q_rad: [f64; 2],
    final_ee_m: [f64; 2],
    target_m: [f64; 2],
    target_clamped: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("reacher_exec", "sessions").wrap_err("Failed to create the session")?;

    // Exec parameters come first as they configure logging
    let mut exec_params: ReacherExecParams =
        util::params::load("reacher_exec.toml").wrap_err("Could not load exec params")?;

    // Initialise logger
    logger_init(&exec_params.log, &session).wrap_err("Failed to initialise logging")?;

    info!("Reacher Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let arm_params: kinematics::Params =
        util::params::load("kinematics.toml").wrap_err("Could not load kinematics params")?;

    info!("Exec parameters loaded");

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // A single argument overrides the control mode
    if args.len() == 2 {
        exec_params.mode = parse_mode(&args[1])?;
        info!("Control mode set from the command line");
    } else if args.len() > 2 {
        return Err(eyre!(
            "Expected either zero or one argument, found {}",
            args.len() - 1
        ));
    }

    info!("Control mode: {:?}", exec_params.mode);

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let arm = TwoLinkArm::new(arm_params);
    info!(
        "Arm link lengths: {} m, {} m",
        arm.params().link_0_length_m,
        arm.params().link_1_length_m
    );

    let mut pd_ctrl = PdCtrl::with_default_gains(arm.clone());
    pd_ctrl
        .init(pd_ctrl_params_file(exec_params.mode), &session)
        .wrap_err("Failed to initialise PdCtrl")?;
    info!("PdCtrl init complete");

    let mut sim = ReacherSim::new(
        arm,
        JointAngles::new(exec_params.initial_q_rad[0], exec_params.initial_q_rad[1]),
        Vector2::new(exec_params.target_m[0], exec_params.target_m[1]),
        exec_params.elbow,
    )
    .wrap_err("Failed to initialise the simulation")?;
    info!("ReacherSim init complete");

    let mut archiver =
        Archiver::from_path(&session, "reacher.csv").wrap_err("Failed to create the archive")?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut num_cycles = 0u64;
    let mut num_proc_errors = 0u64;
    let mut converged = false;

    while num_cycles < exec_params.max_num_cycles {
        // ---- DATA INPUT ----

        let err = active_error(&sim, exec_params.mode);

        if err.norm() < exec_params.converged_threshold {
            converged = true;
            break;
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        let demand = match exec_params.mode {
            ControlMode::EndEffector => ControlDemand::EndEffector {
                state_err: err,
                q: sim.q(),
                dt_s: exec_params.cycle_period_s,
            },
            ControlMode::Joint => ControlDemand::Joint {
                q_err: err,
                dt_s: exec_params.cycle_period_s,
            },
        };

        match pd_ctrl.proc(&demand) {
            Ok((q_delta, report)) => {
                sim.apply(&q_delta);

                // ---- WRITE ARCHIVES ----

                let q = sim.q();
                let ee_m = sim.end_effector_m();
                if let Err(e) = archiver.serialise(CycleRecord {
                    cycle: num_cycles,
                    sim_time_s: num_cycles as f64 * exec_params.cycle_period_s,
                    q0_rad: q.q0_rad,
                    q1_rad: q.q1_rad,
                    ee_x_m: ee_m[0],
                    ee_y_m: ee_m[1],
                    err_0: err[0],
                    err_1: err[1],
                    p_term_0: report.p_term[0],
                    p_term_1: report.p_term[1],
                    d_term_0: report.d_term[0],
                    d_term_1: report.d_term[1],
                    q_delta_0_rad: q_delta[0],
                    q_delta_1_rad: q_delta[1],
                }) {
                    warn!("Could not archive cycle {}: {}", num_cycles, e);
                }
            }
            Err(e) => {
                // The tick is skipped, the arm holds its position
                num_proc_errors += 1;
                warn!("Error during PdCtrl processing: {}", e)
            }
        }

        if exec_params.log_every_num_cycles > 0 && num_cycles % exec_params.log_every_num_cycles == 0
        {
            info!(
                "Cycle {:6}: |err| = {:.6e}, q = [{:.4}, {:.4}] rad",
                num_cycles,
                err.norm(),
                sim.q().q0_rad,
                sim.q().q1_rad
            );
        }

        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    let final_err_norm = active_error(&sim, exec_params.mode).norm();

    if converged {
        info!(
            "Converged after {} cycles, |err| = {:.6e}",
            num_cycles, final_err_norm
        );
    } else {
        warn!(
            "Did not converge within {} cycles, |err| = {:.6e}",
            num_cycles, final_err_norm
        );
    }

    let ee_m = sim.end_effector_m();
    session
        .save(
            "summary.json",
            &RunSummary {
                mode: exec_params.mode,
                kp: *pd_ctrl.kp(),
                kd: *pd_ctrl.kd(),
                num_cycles,
                num_proc_errors,
                converged,
                final_err_norm,
                final_q_rad: [sim.q().q0_rad, sim.q().q1_rad],
                final_ee_m: [ee_m[0], ee_m[1]],
                target_m: [sim.target_m()[0], sim.target_m()[1]],
                target_clamped: sim.target_clamped(),
            },
        )
        .wrap_err("Failed to save the run summary")?;

    info!("End of execution");

    Ok(())
}

/// The error the given control law works on.
fn active_error(sim: &ReacherSim, mode: ControlMode) -> Vector2<f64> {
    match mode {
        ControlMode::EndEffector => sim.state_err(),
        ControlMode::Joint => sim.q_err(),
    }
}

/// Gains suited to each law live in their own parameter file.
fn pd_ctrl_params_file(mode: ControlMode) -> &'static str {
    match mode {
        ControlMode::EndEffector => "pd_ctrl_end_effector.toml",
        ControlMode::Joint => "pd_ctrl_joint.toml",
    }
}

fn parse_mode(arg: &str) -> Result<ControlMode, Report> {
    match arg {
        "joint" => Ok(ControlMode::Joint),
        "end_effector" => Ok(ControlMode::EndEffector),
        other => Err(eyre!(
            "Unknown control mode \"{}\", expected \"joint\" or \"end_effector\"",
            other
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("joint").unwrap(), ControlMode::Joint);
        assert_eq!(parse_mode("end_effector").unwrap(), ControlMode::EndEffector);

        let err = parse_mode("cartesian").unwrap_err();
        assert!(err.to_string().contains("cartesian"));

        // Mode names are matched exactly
        assert!(parse_mode("Joint").is_err());
        assert!(parse_mode("").is_err());
    }

    #[test]
    fn test_params_file_per_mode() {
        assert_eq!(pd_ctrl_params_file(ControlMode::Joint), "pd_ctrl_joint.toml");
        assert_eq!(
            pd_ctrl_params_file(ControlMode::EndEffector),
            "pd_ctrl_end_effector.toml"
        );
    }
}
