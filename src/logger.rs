// This module defines a super simple logger that works with the `log` crate.
// We don't need anything fancy; just basic log levels and the ability to
// print to stderr. We therefore avoid bringing in extra dependencies just
// for this functionality.

use std::sync::Mutex;

use {jiff::tz::TimeZone, log::Log};

use crate::style::Theme;

/// The simplest possible logger that logs to stderr.
///
/// This logger does no filtering. Instead, it relies on the `log` crates
/// filtering via its global max_level setting.
#[derive(Debug)]
pub struct Logger {
    tz: Mutex<Option<TimeZone>>,
}

impl Logger {
    /// Create a new logger that logs to stderr and initialize it as the
    /// global logger. If there was a problem setting the logger, then an
    /// error is returned.
    pub fn init() -> Result<&'static Logger, log::SetLoggerError> {
        let logger = Box::leak(Box::new(Logger { tz: Mutex::new(None) }));
        log::set_logger(logger)?;
        Ok(logger)
    }

    /// Sets the time zone used for the timestamps on log messages.
    ///
    /// Until this is called, timestamps are emitted in UTC. That's not just
    /// laziness: resolving the system time zone can itself emit log
    /// messages, so the logger has to be able to run before the zone is
    /// known.
    pub fn set_time_zone(&self, tz: TimeZone) {
        let mut logger_tz = self.tz.lock().unwrap();
        *logger_tz = Some(tz);
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        // We set the log level via log::set_max_level, so we don't need to
        // implement filtering here.
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        // We avoid calling `Zoned::now()` here, because that might try to
        // read the system time zone from disk, and that in turn can emit
        // log messages. But this is the log implementation, so side-step
        // that to avoid endless recursion.
        let ts = jiff::Timestamp::now();
        let now = self
            .tz
            .lock()
            .unwrap()
            .clone()
            .map(|tz| ts.to_zoned(tz).to_string())
            .unwrap_or_else(|| ts.to_string());
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) => format!("|{file}:{line}"),
            (Some(file), None) => format!("|{file}"),
            _ => String::new(),
        };
        eprintln!(
            "{}|{}{}: {}",
            Theme::stderr().highlight(now),
            record.level(),
            location,
            record.args(),
        );
    }

    fn flush(&self) {
        // We use eprintln! which is flushed on every call.
    }
}
