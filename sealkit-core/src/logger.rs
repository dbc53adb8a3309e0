//! Pluggable logging bridge.
//!
//! Crate code logs through the standard `log` facade; hosts that want the
//! records (a mobile shell, a test harness) install a [`Logger`] once via
//! [`set_logger`] and receive every record as a level + message pair.

use std::sync::{Arc, OnceLock};

/// Trait representing a logger that can receive sealkit log records.
///
/// Implement this to route crate logging into the host's logging system.
pub trait Logger: Send + Sync {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);
}

/// Enumeration of possible log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Designates very low priority, often extremely detailed messages.
    Trace,
    /// Designates lower priority debugging information.
    Debug,
    /// Designates informational messages that highlight the progress of the application.
    Info,
    /// Designates potentially harmful situations.
    Warn,
    /// Designates error events that might still allow the application to continue running.
    Error,
}

/// Forwards `log` crate records to the installed [`Logger`].
struct ForwardingLogger;

impl log::Log for ForwardingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        // Skip debug/trace chatter from other crates; theirs is not ours to
        // forward.
        let from_sealkit = record
            .module_path()
            .is_some_and(|module_path| module_path.starts_with("sealkit"));
        let is_debug_or_trace =
            record.level() == log::Level::Debug || record.level() == log::Level::Trace;
        if is_debug_or_trace && !from_sealkit {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            let message = format!("{}", record.args());
            logger.log(log_level(record.level()), message);
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

/// Converts a `log::Level` to a [`LogLevel`].
const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

/// The installed logger, set at most once for the process.
static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Installs the global logger.
///
/// Call once, before any gated operation runs. A second call is ignored with
/// a note on stdout; the first installation wins.
pub fn set_logger(logger: Arc<dyn Logger>) {
    match LOGGER_INSTANCE.set(logger) {
        Ok(()) => (),
        Err(_) => println!("Logger already set"),
    }

    if let Err(e) = init_facade() {
        eprintln!("Failed to set logger: {e}");
    }
}

/// Hooks the forwarder into the `log` facade.
fn init_facade() -> Result<(), log::SetLoggerError> {
    static FORWARDER: ForwardingLogger = ForwardingLogger;
    log::set_logger(&FORWARDER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
