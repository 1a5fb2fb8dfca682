//! Configuration struct definitions.

use serde::Deserialize;
use std::collections::HashMap;

/// General configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logger name, rendered as the record's `name` key.
    pub name: String,
    /// Minimum log level.
    pub level: String,
    /// strftime pattern for record times; RFC 3339 when unset.
    pub time_format: Option<String>,
    /// Minimum level of rotolog's own diagnostics on stderr.
    pub internal_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: "app".to_string(),
            level: "info".to_string(),
            time_format: None,
            internal_level: "warn".to_string(),
        }
    }
}

/// Blanket caller capture.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CallerConfig {
    /// Capture the caller at all.
    pub enabled: bool,
    /// Restrict capture to these levels; empty means every level.
    pub levels: Vec<String>,
    /// Extra frames to ascend past the call site.
    pub skip: usize,
}

/// Rotating file output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Write to a rotating file instead of stdout.
    pub enabled: bool,
    /// Active log file; `~` is expanded.
    pub path: String,
    /// Rotation threshold (e.g. "10M"); "0" disables rotation.
    pub max_size: String,
    /// Rotated files to keep.
    pub backups: usize,
    /// Gzip rotated files.
    pub compress: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        let path = directories::ProjectDirs::from("", "", "rotolog").map_or_else(
            || "logs/rotolog.log".to_string(),
            |dirs| {
                dirs.state_dir()
                    .unwrap_or_else(|| dirs.data_dir())
                    .join("logs")
                    .join("rotolog.log")
                    .to_string_lossy()
                    .into_owned()
            },
        );

        Self {
            enabled: false,
            path,
            max_size: "10M".to_string(),
            backups: 5,
            compress: false,
        }
    }
}

/// JSON formatter configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// Always emit `fields` and `caller`.
    pub full: bool,
    /// Logical key → output key.
    pub keys: HashMap<String, String>,
}
