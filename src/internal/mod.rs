//! Rotolog's own diagnostic logger, for events that must not travel through
//! the caller's return path: hook failures, rotation trouble, config loading.
//!
//! Uses `OnceLock` so the logger is initialized exactly once, even if several
//! entry points race to call `init`. Records go to stderr as JSON lines with
//! a `scope` field.

use crate::config::Config;
use crate::level::Level;
use crate::logger::Logger;
use std::sync::OnceLock;

static INTERNAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Initializes with warn level; later calls are no-ops.
pub fn init() {
    INTERNAL_LOGGER.get_or_init(|| build_internal_logger(Level::Warn));
}

/// Initializes with the config's `internal_level`; later calls are no-ops.
pub fn init_with_config(config: &Config) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| build_internal_logger(config.internal_level()));
    if !was_init {
        debug(
            "INTERNAL",
            &format!("Internal logger ready at {}", config.internal_level()),
        );
    }
}

fn build_internal_logger(level: Level) -> Logger {
    Logger::builder()
        .name("rotolog")
        .level(level)
        .output(std::io::stderr())
        .disable_terminal_actions()
        .build()
}

/// Pre-init calls silently vanish rather than failing.
fn log(level: Level, scope: &str, msg: &str) {
    if let Some(logger) = INTERNAL_LOGGER.get() {
        let _ = logger.with_field("scope", scope).log(level, msg);
    }
}

pub fn trace(scope: &str, msg: &str) {
    log(Level::Trace, scope, msg);
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Non-fatal anomalies: failed hooks, backups that could not be pruned.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

/// Failures that were also returned to a caller, recorded for context.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
