//! Terminal rendering of configuration errors

use crate::error::ConfigError;
use std::fmt;
use std::io::IsTerminal;
use yansi::Paint;

/// Wraps a [`ConfigError`] for display on stderr, colouring the parts a user
/// has to act on when stderr is a terminal and `NO_COLOR` is unset.
pub struct ErrorFormatter {
    error: ConfigError,
    color: bool,
}

impl ErrorFormatter {
    pub fn new(error: ConfigError) -> Self {
        let color = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        Self { error, color }
    }

    pub fn plain(error: ConfigError) -> Self {
        Self {
            error,
            color: false,
        }
    }

    fn write_colored(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cross = "error:".red().bold();
        match &self.error {
            ConfigError::InvalidEnum {
                field,
                value,
                options,
                hint,
            } => write!(
                f,
                "{} {} = {} is not one of [{}]; {}",
                cross,
                field.cyan(),
                value.as_str().yellow(),
                options,
                hint.as_str().green()
            ),
            ConfigError::FileNotFound { path } => write!(
                f,
                "{} config file {} does not exist",
                cross,
                path.display().to_string().yellow()
            ),
            ConfigError::ValidationError { field, message } => {
                write!(f, "{} {}: {}", cross, field.cyan(), message)
            }
            other => write!(f, "{} {}", cross, other),
        }
    }
}

impl fmt::Display for ErrorFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.color {
            self.write_colored(f)
        } else {
            write!(f, "{}", self.error)
        }
    }
}
