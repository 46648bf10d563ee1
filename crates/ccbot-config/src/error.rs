//! Configuration errors

pub mod format;

use std::path::PathBuf;
use thiserror::Error;

pub use format::ErrorFormatter;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", path.display())]
    FileNotFound { path: PathBuf },

    #[error("{} has no recognised config extension (expected .toml, .yml, .yaml or .json)", path.display())]
    UnknownFormat { path: PathBuf },

    /// Syntax or shape error in a config document. `snippet` holds the
    /// surrounding source lines when the parser reported a position.
    #[error("cannot parse {format} config{origin}: {message}{snippet}")]
    Parse {
        format: &'static str,
        origin: String,
        message: String,
        snippet: String,
    },

    #[error("cannot read {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{field} = '{value}' is not one of [{options}]; {hint}")]
    InvalidEnum {
        field: String,
        value: String,
        options: String,
        hint: String,
    },

    #[error("{field} is {value}, must be greater than {min}")]
    InvalidInteger {
        field: String,
        value: usize,
        min: usize,
    },

    #[error("environment variable {var}: {message}")]
    EnvVarError { var: String, message: String },

    #[error("{field}: {message}")]
    ValidationError { field: String, message: String },
}

impl ConfigError {
    /// Unknown enum value, with the nearest option as a hint
    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        options: &[&str],
    ) -> Self {
        let value = value.into();
        let hint = match nearest(&value, options) {
            Some(option) => format!("did you mean '{}'?", option),
            None => "check the spelling in your config".to_string(),
        };
        Self::InvalidEnum {
            field: field.into(),
            value,
            options: options.join(", "),
            hint,
        }
    }

    pub(crate) fn parse(
        format: &'static str,
        message: impl Into<String>,
        content: &str,
        position: Option<(usize, usize)>,
        path: Option<&str>,
    ) -> Self {
        Self::Parse {
            format,
            origin: path.map(|p| format!(" ({})", p)).unwrap_or_default(),
            message: message.into(),
            snippet: position
                .map(|(line, col)| excerpt(content, line, col))
                .filter(|s| !s.is_empty())
                .map(|s| format!("\n{}", s))
                .unwrap_or_default(),
        }
    }

    pub fn from_yaml_error(err: serde_yaml::Error, content: &str, path: Option<&str>) -> Self {
        let position = err.location().map(|loc| (loc.line(), loc.column()));
        Self::parse("YAML", err.to_string(), content, position, path)
    }

    pub fn from_toml_error(err: toml::de::Error, content: &str, path: Option<&str>) -> Self {
        let position = err.span().map(|span| {
            let before = &content[..span.start.min(content.len())];
            let line = before.matches('\n').count() + 1;
            let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
            (line, col)
        });
        Self::parse("TOML", err.message(), content, position, path)
    }

    pub fn from_json_error(err: serde_json::Error, content: &str, path: Option<&str>) -> Self {
        let position = Some((err.line(), err.column()));
        Self::parse("JSON", err.to_string(), content, position, path)
    }
}

/// Closest option within edit distance 2, compared case-insensitively
fn nearest<'a>(value: &str, options: &[&'a str]) -> Option<&'a str> {
    let value = value.trim().to_lowercase();
    options
        .iter()
        .map(|opt| (edit_distance(&value, &opt.to_lowercase()), *opt))
        .filter(|(d, _)| *d <= 2)
        .min_by_key(|(d, _)| *d)
        .map(|(_, opt)| opt)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}

/// The offending line (1-based) with one line either side. A caret marks
/// `col` when it is known.
fn excerpt(content: &str, line: usize, col: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    if line == 0 || line > lines.len() {
        return String::new();
    }
    let first = line.saturating_sub(1).max(1);
    let last = (line + 1).min(lines.len());

    let mut out = Vec::new();
    for n in first..=last {
        let marker = if n == line { '>' } else { ' ' };
        out.push(format!("{} {:>4} | {}", marker, n, lines[n - 1]));
        if n == line && col > 0 {
            out.push(format!("{:>8} {}^", "|", " ".repeat(col - 1)));
        }
    }
    out.join("\n")
}
