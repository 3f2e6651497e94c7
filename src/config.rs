//! Command-line and environment configuration for the `pocketcalc` binary.

use crate::interpreter::Options;
use crate::logging;
use crate::parser::NumberMode;
use log::LevelFilter;
use std::path::PathBuf;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: pocketcalc [OPTIONS] [FILE]

Evaluates arithmetic expressions: numbers, + - * / ^, parentheses and sqrt(...).
Without FILE an interactive session is started; type `exit` to leave.

Options:
  -e, --eval EXPR       evaluate EXPR and exit
      --lenient-numbers treat malformed numbers such as `.` as 0
      --show-tree       print the parse tree before each result
      --history FILE    load and save interactive history in FILE
  -v, --verbose         log at debug level (overrides POCKETCALC_LOG)
  -h, --help            print this help";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("option '{0}' requires a value")]
    MissingValue(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("unexpected argument '{0}', only one input file is accepted")]
    UnexpectedArgument(String),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Repl,
    Script(PathBuf),
    Eval(String),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub options: Options,
    pub show_tree: bool,
    pub history: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Repl,
            options: Options::default(),
            show_tree: false,
            history: None,
            log_level: logging::DEFAULT_LEVEL,
        }
    }
}

impl Config {
    /// Reads the process arguments and `POCKETCALC_LOG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let level = std::env::var(logging::LOG_ENV).ok();
        Self::from_args(std::env::args().skip(1), level.as_deref())
    }

    /// `args` excludes the program name.
    pub fn from_args<I>(args: I, log_level: Option<&str>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        if let Some(level) = log_level {
            config.log_level = logging::parse_level(level)
                .ok_or_else(|| ConfigError::InvalidLogLevel(level.to_string()))?;
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => config.mode = Mode::Help,
                "-v" | "--verbose" => config.log_level = LevelFilter::Debug,
                "--lenient-numbers" => config.options.number_mode = NumberMode::Lenient,
                "--show-tree" => config.show_tree = true,
                "--history" => {
                    let path = args.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                    config.history = Some(PathBuf::from(path));
                }
                "-e" | "--eval" => {
                    let expr = args.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                    config.set_mode(Mode::Eval(expr), &arg)?;
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ConfigError::UnknownOption(flag.to_string()));
                }
                _ => {
                    let mode = Mode::Script(PathBuf::from(&arg));
                    config.set_mode(mode, &arg)?;
                }
            }
        }
        Ok(config)
    }

    fn set_mode(&mut self, mode: Mode, arg: &str) -> Result<(), ConfigError> {
        match self.mode {
            Mode::Repl => {
                self.mode = mode;
                Ok(())
            }
            Mode::Help => Ok(()),
            _ => Err(ConfigError::UnexpectedArgument(arg.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config(args: &[&str]) -> Result<Config, ConfigError> {
        Config::from_args(args.iter().map(|s| s.to_string()), None)
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.options.number_mode, NumberMode::Strict);
        assert_eq!(config.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_flags() {
        let args = ["--lenient-numbers", "--show-tree", "-v", "--history", "h.txt"];
        let config = config(&args).unwrap();
        assert_eq!(config.options.number_mode, NumberMode::Lenient);
        assert!(config.show_tree);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.history, Some(PathBuf::from("h.txt")));
        assert_eq!(config.mode, Mode::Repl);
    }

    #[test]
    fn test_modes() {
        assert_eq!(
            config(&["input.txt"]).unwrap().mode,
            Mode::Script(PathBuf::from("input.txt"))
        );
        assert_eq!(
            config(&["-e", "1 + 1"]).unwrap().mode,
            Mode::Eval("1 + 1".to_string())
        );
        assert_eq!(config(&["-h", "input.txt"]).unwrap().mode, Mode::Help);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            config(&["--frobnicate"]),
            Err(ConfigError::UnknownOption("--frobnicate".to_string()))
        );
        assert_eq!(
            config(&["--eval"]),
            Err(ConfigError::MissingValue("--eval".to_string()))
        );
        assert_eq!(
            config(&["a.txt", "b.txt"]),
            Err(ConfigError::UnexpectedArgument("b.txt".to_string()))
        );
    }

    #[test]
    fn test_log_level_from_env_value() {
        let config = Config::from_args(Vec::new(), Some("trace")).unwrap();
        assert_eq!(config.log_level, LevelFilter::Trace);
        assert_eq!(
            Config::from_args(Vec::new(), Some("loud")),
            Err(ConfigError::InvalidLogLevel("loud".to_string()))
        );
    }
}
