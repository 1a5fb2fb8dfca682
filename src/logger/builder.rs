//! Stepwise construction of a `Logger`. Every option here can also be changed
//! later through the logger's own setters.

use super::hook::{Hook, hook_fn};
use super::settings::{self, CallerCapture, ExitFn, NowFn, PanicFn, Settings};
use super::Logger;
use crate::entity::Summary;
use crate::fmt::Formatter;
use crate::level::Level;
use std::io::Write;
use std::sync::Arc;

pub struct LoggerBuilder {
    name: String,
    settings: Settings,
    hooks: Vec<Arc<dyn Hook>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Info level, JSON to stdout, no caller capture, terminating fatal/panic actions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            settings: Settings::default(),
            hooks: Vec::new(),
        }
    }

    /// Rendered as the record's `name` key.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.settings.level = level;
        self
    }

    #[must_use]
    pub fn output(mut self, writer: impl Write + Send + 'static) -> Self {
        self.settings.sink = settings::sink(writer);
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.settings.formatter = Some(Arc::new(formatter));
        self
    }

    /// Fixed clocks make record times reproducible in tests.
    #[must_use]
    pub fn now_fn(mut self, now: NowFn) -> Self {
        self.settings.now = Some(now);
        self
    }

    #[must_use]
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.settings.time_format = Some(format.into());
        self
    }

    #[must_use]
    pub const fn caller(mut self, skip: usize) -> Self {
        self.settings.caller = CallerCapture::all(skip);
        self
    }

    #[must_use]
    pub fn levels_caller(mut self, levels: &[Level], skip: usize) -> Self {
        self.settings.caller = CallerCapture::levels(levels, skip);
        self
    }

    #[must_use]
    pub fn exit_fn(mut self, exit: ExitFn) -> Self {
        self.settings.exit = Some(exit);
        self
    }

    #[must_use]
    pub fn panic_fn(mut self, panic: PanicFn) -> Self {
        self.settings.panic = Some(panic);
        self
    }

    /// Fatal and panic records no longer end execution.
    #[must_use]
    pub fn disable_terminal_actions(self) -> Self {
        self.exit_fn(Arc::new(|_| {})).panic_fn(Arc::new(|_| {}))
    }

    #[must_use]
    pub fn hook(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    #[must_use]
    pub fn hook_fn<F>(self, levels: impl Into<Vec<Level>>, f: F) -> Self
    where
        F: Fn(&Summary<'_>) -> Result<(), crate::Error> + Send + Sync + 'static,
    {
        self.hook(hook_fn(levels, f))
    }

    #[must_use]
    pub fn build(self) -> Logger {
        Logger::from_parts(self.name, self.settings, self.hooks)
    }
}
