//! Cyclic module interface
//!
//! The exec drives its control modules through [`State`]: `init` once at
//! startup, then `proc` once per control cycle with that cycle's
//! measurements.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::session::Session;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A module stepped once per control cycle.
///
/// Implementors own whatever history they carry between cycles (the PD
/// controller's previous-error registers, for example) and are expected to
/// honour two rules:
///
/// - `init` leaves the module as if no cycle had run yet, whatever happened
///   before it was called.
/// - A `proc` that fails changes no state, so the exec can skip the cycle and
///   carry on.
pub trait State {
    /// What `init` needs, typically the name of a file under `params/`.
    type InitData;
    type InitError;

    /// One cycle's measurements.
    type InputData;

    /// The demand produced for the cycle.
    type OutputData;

    /// Internal values worth archiving alongside the demand.
    type StatusReport;
    type ProcError;

    /// Load parameters and discard any cycle history.
    ///
    /// `session` is available for modules which archive their own data.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one control cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
