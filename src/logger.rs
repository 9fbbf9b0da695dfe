//! Stderr line logger backing the `log` crate facade.
//!
//! The driver's own progress lines go through `log::info!` and friends;
//! this module wires those macros to timestamped lines on stderr. Child
//! process output is never captured or rewritten, so build and test
//! failures surface exactly as the underlying tool printed them.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable selecting the log level (`error` .. `trace`).
pub const LOG_LEVEL_ENV: &str = "CORTEXBUILD_LOG";

/// Timestamped stderr logger.
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{} [{}] {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Parse a level name from the environment, defaulting to `info`.
fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Install the stderr logger as the global `log` backend.
///
/// Must run before any other driver code logs. Safe to call once per
/// process; a second call leaves the first logger in place.
pub fn initialize_logging() {
    let level = level_from_env(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_info() {
        assert_eq!(level_from_env(None), LevelFilter::Info);
        assert_eq!(level_from_env(Some("garbage")), LevelFilter::Info);
    }

    #[test]
    fn test_named_levels_parse() {
        assert_eq!(level_from_env(Some("error")), LevelFilter::Error);
        assert_eq!(level_from_env(Some("WARN")), LevelFilter::Warn);
        assert_eq!(level_from_env(Some("debug")), LevelFilter::Debug);
        assert_eq!(level_from_env(Some("trace")), LevelFilter::Trace);
        assert_eq!(level_from_env(Some("off")), LevelFilter::Off);
    }
}
