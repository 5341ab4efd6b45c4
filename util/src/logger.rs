//! Session logging
//!
//! Log records are written both to stdout and to the session's log file. The
//! verbosity is configured from the exec's parameter file: a default level
//! plus optional per-target overrides, so that a chatty module (for example a
//! controller logging every cycle) can be quietened without losing debug
//! output from the rest of the exec.
//!
//! ```toml
//! [log]
//! level = "debug"
//!
//! [log.targets]
//! "reacher_lib::pd_ctrl" = "info"
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Logging verbosity of an exec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogParams {
    /// Level applied to every target without an override.
    ///
    /// Must be `info` or more verbose so the session always records progress.
    pub level: LevelFilter,

    /// Level overrides keyed by target, i.e. module path such as
    /// `reacher_lib::pd_ctrl`. Overrides apply to child modules too.
    #[serde(default)]
    pub targets: BTreeMap<String, LevelFilter>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The default log level must be `INFO` or more verbose, found `{0}`")]
    LevelTooQuiet(LevelFilter),

    #[error("Cannot open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been set: {0}")]
    AlreadyInitialised(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LogParams {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            targets: BTreeMap::new(),
        }
    }
}

impl LogParams {
    /// Check the parameters can be used to initialise the logger.
    pub fn validate(&self) -> Result<(), LoggerInitError> {
        if self.level < Level::Info {
            Err(LoggerInitError::LevelTooQuiet(self.level))
        } else {
            Ok(())
        }
    }

    /// The most verbose level any target can log at.
    pub fn max_level(&self) -> LevelFilter {
        self.targets
            .values()
            .copied()
            .fold(self.level, Ord::max)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise logging for this execution.
///
/// Must only be called once per process, a second call returns
/// `AlreadyInitialised`.
pub fn logger_init(params: &LogParams, session: &Session) -> Result<(), LoggerInitError> {
    params.validate()?;

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let dispatch = params.targets.iter().fold(
        fern::Dispatch::new().level(params.level),
        |dispatch, (target, &level)| dispatch.level_for(target.clone(), level),
    );

    dispatch
        .format(format_line)
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::AlreadyInitialised)?;

    info!(
        "Logging to {:?}, session epoch {}",
        session.log_file_path,
        session::get_epoch()
    );
    info!(
        "Log level: {}, most verbose target at {}",
        params.level,
        params.max_level()
    );
    for (target, level) in &params.targets {
        info!("    {}: {}", target, level);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Prefix a record with the session time and its level tag. Debug and trace
/// records also name their target.
fn format_line(out: fern::FormatCallback, message: &fmt::Arguments, record: &Record) {
    if record.level() > Level::Info {
        out.finish(format_args!(
            "[{:10.6} {}] {}: {}",
            session::get_elapsed_seconds(),
            level_tag(record.level()),
            record.target(),
            message
        ))
    } else {
        out.finish(format_args!(
            "[{:10.6} {}] {}",
            session::get_elapsed_seconds(),
            level_tag(record.level()),
            message
        ))
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info => "INF".normal(),
        Level::Warn => "WRN".yellow(),
        Level::Error => "ERR".red().bold(),
    }
}
