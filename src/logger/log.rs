//! Derived handles that carry fields and a caller override into a log call.

use super::Logger;
use crate::entity::Fields;
use crate::level::Level;
use serde::Serialize;
use std::fmt::Display;

/// A logger view with extra fields and an optional per-call caller depth.
///
/// Created by [`Logger::with_field`], [`Logger::with_fields`] or
/// [`Logger::with_caller`]; every `with_*` call returns a new derivation and
/// leaves the handle it was called on untouched.
#[derive(Clone)]
pub struct Log<'a> {
    logger: &'a Logger,
    fields: Fields,
    caller_skip: Option<usize>,
}

impl<'a> Log<'a> {
    pub(super) fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            fields: Fields::new(),
            caller_skip: None,
        }
    }

    /// New handle with one more field; `self` stays usable.
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Serialize) -> Self {
        let mut next = self.clone();
        next.fields.insert(key, value);
        next
    }

    #[must_use]
    pub fn with_fields<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Serialize,
    {
        let mut next = self.clone();
        for (k, v) in fields {
            next.fields.insert(k, v);
        }
        next
    }

    /// Captures the caller for calls through this handle, `skip` frames above
    /// the call site. Replaces any depth set by an earlier derivation, and
    /// takes precedence over the logger's blanket caller settings.
    ///
    /// Any `skip` above zero captures and walks a full backtrace on every call
    /// through this handle; see [`Logger::enable_caller`] for its limits.
    #[must_use]
    pub fn with_caller(&self, skip: usize) -> Self {
        Self {
            caller_skip: Some(skip),
            ..self.clone()
        }
    }

    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn log(&self, level: Level, msg: impl Display) -> Result<(), crate::Error> {
        self.logger.dispatch(level, &msg, &self.fields, self.caller_skip)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn trace(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.logger.dispatch(Level::Trace, &msg, &self.fields, self.caller_skip)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn debug(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.logger.dispatch(Level::Debug, &msg, &self.fields, self.caller_skip)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn info(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.logger.dispatch(Level::Info, &msg, &self.fields, self.caller_skip)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn warn(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.logger.dispatch(Level::Warn, &msg, &self.fields, self.caller_skip)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn error(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.logger.dispatch(Level::Error, &msg, &self.fields, self.caller_skip)
    }

    /// Logs, then runs the logger's exit action.
    ///
    /// # Errors
    /// Formatter or sink errors, when the exit action returns.
    #[track_caller]
    pub fn fatal(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.logger.dispatch(Level::Fatal, &msg, &self.fields, self.caller_skip)
    }

    /// Logs, then runs the logger's panic action.
    ///
    /// # Errors
    /// Formatter or sink errors, when the panic action returns.
    #[track_caller]
    pub fn panic(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.logger.dispatch(Level::Panic, &msg, &self.fields, self.caller_skip)
    }
}
