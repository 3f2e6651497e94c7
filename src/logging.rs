//! Minimal stderr backend for the `log` facade.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable holding the log level (`error`, `warn`, `info`,
/// `debug`, `trace` or `off`).
pub const LOG_ENV: &str = "POCKETCALC_LOG";

pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs the logger. Only the first call has any effect on the backend,
/// later calls just adjust the level.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let installed = log::set_logger(&LOGGER);
    log::set_max_level(level);
    installed
}

pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("chatty"), None);
    }
}
