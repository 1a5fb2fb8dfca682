//! TOML configuration for building a `Logger` without code.
//!
//! Every section is `#[serde(default)]`, so an empty or missing file still
//! yields a working stdout logger.

mod size;
mod structs;

pub use size::{format_size, parse_size};
pub use structs::{CallerConfig, FileConfig, GeneralConfig, JsonConfig};

use crate::internal;
use crate::level::Level;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Name, level, and time format apply to every record.
    pub general: GeneralConfig,
    /// Which levels capture their call site.
    pub caller: CallerConfig,
    /// Rotating file sink; stdout when disabled.
    pub file: FileConfig,
    /// JSON key names and shape.
    pub json: JsonConfig,
}

impl Config {
    /// `<config dir>/rotolog/config.toml`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rotolog")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads from [`Config::default_path`]; a missing file yields defaults.
    ///
    /// # Errors
    /// I/O errors other than a missing file, and TOML syntax errors.
    pub fn load() -> Result<Self, crate::Error> {
        let Some(path) = Self::default_path() else {
            internal::debug("CONFIG", "No config directory, using defaults");
            return Ok(Self::default());
        };
        Self::load_from(&path)
    }

    /// Loads from an explicit path; a missing file yields defaults.
    ///
    /// # Errors
    /// I/O errors other than a missing file, and TOML syntax errors.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        internal::info("CONFIG", &format!("Config loaded from {}", path.display()));
        Ok(config)
    }

    /// Parses TOML text.
    ///
    /// # Errors
    /// TOML syntax or type errors.
    pub fn parse(content: &str) -> Result<Self, crate::Error> {
        Ok(toml::from_str(content)?)
    }

    /// Strict level parse.
    ///
    /// # Errors
    /// `Error::InvalidLevel` for unknown names.
    pub fn level(&self) -> Result<Level, crate::Error> {
        Ok(self.general.level.parse()?)
    }

    /// Level for rotolog's own diagnostics; unknown names fall back to warn.
    #[must_use]
    pub fn internal_level(&self) -> Level {
        self.general.internal_level.parse().unwrap_or(Level::Warn)
    }

    /// Levels listed under `[caller]`.
    ///
    /// # Errors
    /// `Error::InvalidLevel` for unknown names.
    pub fn caller_levels(&self) -> Result<Vec<Level>, crate::Error> {
        self.caller
            .levels
            .iter()
            .map(|l| l.parse::<Level>().map_err(Into::into))
            .collect()
    }

    /// Rotation threshold in bytes.
    ///
    /// # Errors
    /// `Error::InvalidSize` when `max_size` is not a size.
    pub fn max_size_bytes(&self) -> Result<u64, crate::Error> {
        parse_size(&self.file.max_size)
            .ok_or_else(|| crate::Error::InvalidSize(self.file.max_size.clone()))
    }

    /// `file.path` with `~` expanded.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.file.path).as_ref())
    }
}
