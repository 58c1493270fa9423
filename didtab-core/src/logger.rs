//! Forwards `log` records to a host-provided [`Logger`].

use std::sync::{Arc, OnceLock};

/// Sink for log lines produced by the DIDs tab core.
///
/// The host (extension background page, mobile shell) implements this trait and
/// registers it once with [`set_logger`]. Recovery phrase words and passwords are
/// never part of a message.
///
/// # Examples
///
/// ```rust
/// use didtab_core::logger::{Logger, LogLevel};
///
/// struct ConsoleLogger;
///
/// impl Logger for ConsoleLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{level:?}] {message}");
///     }
/// }
/// ```
///
/// ## Kotlin
///
/// ```kotlin
/// object DidTabLogger : Logger {
///     override fun log(level: LogLevel, message: String) {
///         Timber.tag("didtab").log(level.toPriority(), message)
///     }
/// }
///
/// setLogger(DidTabLogger) // once, at application start
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs a message at the specified level.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very detailed tracing output.
    Trace,
    /// Debugging information.
    Debug,
    /// Normal progress of the tab (mount, state transitions).
    Info,
    /// Degraded paths, e.g. an unreadable DID cache.
    Warn,
    /// Failures the host should look at.
    Error,
}

/// Bridges the `log` facade to the registered foreign [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let is_record_from_didtab = record
            .module_path()
            .is_some_and(|module_path| module_path.starts_with("didtab"));

        let is_debug_or_trace_level =
            record.level() == log::Level::Debug || record.level() == log::Level::Trace;

        // Dependencies are only forwarded from Info upwards.
        if is_debug_or_trace_level && !is_record_from_didtab {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), format!("{}", record.args()));
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Registers the host logger and installs the `log` bridge.
///
/// Only the first registration takes effect; later calls are ignored.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        println!("Logger already set");
        return;
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
