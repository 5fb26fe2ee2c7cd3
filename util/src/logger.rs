//! Logger initialisation
//!
//! Messages go to stdout with coloured level tags and to the session's log
//! file as plain text. Each line is prefixed with the wall clock time since
//! the session started.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{self, info};
use std::fmt;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Prefix of targets inside the simulator library, dropped from log lines.
const LIB_TARGET_PREFIX: &str = "arm_lib::";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level less than `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `module_levels` overrides `min_level` for individual modules, for example
/// `("arm_lib::joint", LevelFilter::Debug)` keeps the per-cycle joint trace
/// out of a `Trace` log.
///
/// # Notes
///
/// - `min_level` must let `INFO` messages through.
/// - Must only be called once, a second call returns `FernInitError`.
pub fn logger_init(
    min_level: LevelFilter,
    module_levels: &[(&'static str, LevelFilter)],
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    check_min_level(min_level)?;

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new().level(min_level);
    for (module, level) in module_levels {
        dispatch = dispatch.level_for(*module, *level);
    }

    dispatch
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("{}", format_line(message, record, true)))
                })
                .chain(std::io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("{}", format_line(message, record, false)))
                })
                .chain(log_file),
        )
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Log level: {:?}", min_level);
    for (module, level) in module_levels {
        info!("    Log level for {}: {:?}", module, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Reject filters which would hide `INFO` messages.
fn check_min_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    Ok(())
}

/// Build one log line. Debug and trace lines also name their module.
fn format_line(message: &fmt::Arguments, record: &log::Record, coloured: bool) -> String {
    let tag = level_tag(record.level(), coloured);
    let elapsed_s = session::get_elapsed_seconds();

    if record.level() > log::Level::Info {
        format!(
            "[{:10.6} {}] {}: {}",
            elapsed_s,
            tag,
            short_target(record.target()),
            message
        )
    } else {
        format!("[{:10.6} {}] {}", elapsed_s, tag, message)
    }
}

/// Module path with the simulator library prefix removed.
fn short_target(target: &str) -> &str {
    if target.starts_with(LIB_TARGET_PREFIX) {
        &target[LIB_TARGET_PREFIX.len()..]
    } else {
        target
    }
}

/// Three letter tag for a level, styled only when `coloured` is set.
fn level_tag(level: log::Level, coloured: bool) -> ColoredString {
    let tag = match level {
        log::Level::Trace => "TRC",
        log::Level::Debug => "DBG",
        log::Level::Info => "INF",
        log::Level::Warn => "WRN",
        log::Level::Error => "ERR",
    };

    if !coloured {
        return tag.normal();
    }

    match level {
        log::Level::Trace => tag.dimmed().italic(),
        log::Level::Debug => tag.dimmed(),
        log::Level::Info => tag.normal(),
        log::Level::Warn => tag.yellow(),
        log::Level::Error => tag.red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check_min_level() {
        assert!(check_min_level(LevelFilter::Trace).is_ok());
        assert!(check_min_level(LevelFilter::Info).is_ok());
        assert!(matches!(
            check_min_level(LevelFilter::Warn),
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn))
        ));
    }

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("arm_lib::goal_loop::state"), "goal_loop::state");
        assert_eq!(short_target("arm_exec"), "arm_exec");
        assert_eq!(short_target("util::session"), "util::session");
    }

    #[test]
    fn test_plain_tags_have_no_escapes() {
        for level in [
            log::Level::Trace,
            log::Level::Debug,
            log::Level::Info,
            log::Level::Warn,
            log::Level::Error,
        ]
        .iter()
        {
            let tag = level_tag(*level, false).to_string();
            assert_eq!(tag.len(), 3);
            assert!(!tag.contains('\u{1b}'));
        }
    }

    /// Plain log line for a message "x" from the arm state module.
    fn line_at(level: log::Level) -> String {
        format_line(
            &format_args!("x"),
            &log::Record::builder()
                .level(level)
                .target("arm_lib::arm_ctrl::state")
                .args(format_args!("x"))
                .build(),
            false,
        )
    }

    #[test]
    fn test_debug_lines_name_their_module() {
        assert!(line_at(log::Level::Debug).ends_with("DBG] arm_ctrl::state: x"));
        assert!(line_at(log::Level::Info).ends_with("INF] x"));
    }
}
