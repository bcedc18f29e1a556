//! Command-line configuration for the server binary.

use crate::{ALT_PORT, DEFAULT_HOST, DEFAULT_PORT};
use thiserror::Error;

/// Errors from command-line parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Default tracing filter, used when `RUST_LOG` is unset
    pub log_level: String,
}

/// What the binary should do after parsing its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(Config),
    Help,
    Version,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parses command-line arguments, excluding the program name.
    ///
    /// # Example
    ///
    /// ```
    /// use scorekv::config::{CliAction, Config};
    ///
    /// let args = vec!["--port".to_string(), "7000".to_string()];
    /// match Config::from_args(&args).unwrap() {
    ///     CliAction::Run(config) => assert_eq!(config.bind_address(), "127.0.0.1:7000"),
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn from_args(args: &[String]) -> Result<CliAction, ConfigError> {
        let mut config = Config::default();
        let mut args = args.iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" | "-h" => {
                    config.host = take_value(arg, args.next())?.to_string();
                }
                "--port" | "-p" => {
                    let value = take_value(arg, args.next())?;
                    config.port = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidPort(value.to_string()))?;
                }
                "--alt-port" => config.port = ALT_PORT,
                "--log-level" => {
                    config.log_level = take_value(arg, args.next())?.to_string();
                }
                "--help" => return Ok(CliAction::Help),
                "--version" | "-v" => return Ok(CliAction::Version),
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }

        Ok(CliAction::Run(config))
    }

    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn take_value<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str, ConfigError> {
    value
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run_config(list: &[&str]) -> Config {
        match Config::from_args(&args(list)).unwrap() {
            CliAction::Run(config) => config,
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let config = run_config(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address(), "127.0.0.1:6379");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_host_and_port() {
        let config = run_config(&["-h", "0.0.0.0", "--port", "7000"]);
        assert_eq!(config.bind_address(), "0.0.0.0:7000");
    }

    #[test]
    fn test_alt_port() {
        assert_eq!(run_config(&["--alt-port"]).port, 6380);
        // Later flags win
        assert_eq!(run_config(&["--alt-port", "-p", "9000"]).port, 9000);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(run_config(&["--log-level", "debug"]).log_level, "debug");
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(Config::from_args(&args(&["--help"])), Ok(CliAction::Help));
        assert_eq!(Config::from_args(&args(&["-v"])), Ok(CliAction::Version));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Config::from_args(&args(&["--port"])),
            Err(ConfigError::MissingValue("--port".to_string()))
        );
        assert_eq!(
            Config::from_args(&args(&["--port", "99999"])),
            Err(ConfigError::InvalidPort("99999".to_string()))
        );
        assert_eq!(
            Config::from_args(&args(&["--bogus"])),
            Err(ConfigError::UnknownArgument("--bogus".to_string()))
        );
    }
}
