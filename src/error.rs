//! Unified error type for all rotolog operations.

use std::path::PathBuf;

/// Error type for rotolog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from a sink, the rotating writer, or config loading.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// JSON formatter key outside `name|time|level|message|fields|caller`.
    InvalidFormatterKey(String),
    /// Rotating writer target cannot hold a log file (e.g. it is a directory).
    InvalidWriterTarget(PathBuf),
    /// Unknown level name in config.
    InvalidLevel(String),
    /// Size string in config that `parse_size` rejects.
    InvalidSize(String),
    /// A record could not be serialized.
    Format(String),
    /// Write attempted after the writer was closed.
    WriterClosed,
    /// A hook reported a failure.
    Hook(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::InvalidFormatterKey(key) => write!(f, "invalid json formatter key {key:?}"),
            Self::InvalidWriterTarget(p) => write!(f, "invalid writer target: {}", p.display()),
            Self::InvalidLevel(level) => write!(f, "invalid level: {level}"),
            Self::InvalidSize(size) => write!(f, "invalid size: {size}"),
            Self::Format(s) => write!(f, "format error: {s}"),
            Self::WriterClosed => write!(f, "writer is closed"),
            Self::Hook(s) => write!(f, "hook error: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e.to_string())
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => e,
            other => Self::other(other),
        }
    }
}
