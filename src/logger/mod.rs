//! The dispatcher: level filter, caller capture, formatting, sink write, hooks,
//! and the terminal actions of the two highest levels, all on the caller's thread.
//!
//! Configuration lives in an immutable snapshot that setters swap atomically,
//! so the builder and the runtime setters share one representation and a call
//! in flight never sees half an update.

mod builder;
mod caller;
mod from_config;
mod hook;
mod log;
mod settings;

pub use builder::LoggerBuilder;
pub use caller::UNKNOWN_CALLER;
pub use hook::{Hook, hook_fn};
pub use log::Log;
pub use settings::{ExitFn, NowFn, PanicFn};

use crate::entity::{EMPTY_FIELDS, Entity, Fields, Summary};
use crate::fmt::{Formatter, Pool, default_json_formatter};
use crate::level::Level;
use chrono::Local;
use hook::HookRegistry;
use parking_lot::RwLock;
use serde::Serialize;
use settings::{CallerCapture, Settings};
use std::fmt::Display;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;

/// Exit code handed to the exit action after a fatal record.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Scratch buffers records are formatted into.
static BUFFERS: Pool<Vec<u8>> = Pool::new();

/// Safe to share between threads; every method takes `&self`.
pub struct Logger {
    name: String,
    settings: RwLock<Arc<Settings>>,
    hooks: HookRegistry,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Logger writing JSON lines to stdout at the default level.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        LoggerBuilder::new().name(name).build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn from_parts(name: String, settings: Settings, hooks: Vec<Arc<dyn Hook>>) -> Self {
        let logger = Self {
            name,
            settings: RwLock::new(Arc::new(settings)),
            hooks: HookRegistry::default(),
        };
        for hook in hooks {
            logger.hooks.add(hook);
        }
        logger
    }

    fn snapshot(&self) -> Arc<Settings> {
        Arc::clone(&self.settings.read())
    }

    /// Copy-on-write update of the settings snapshot.
    fn update(&self, f: impl FnOnce(&mut Settings)) {
        let mut current = self.settings.write();
        let mut next = Settings::clone(&current);
        f(&mut next);
        *current = Arc::new(next);
    }

    /// Core pipeline. Records below the threshold return before anything is built.
    #[track_caller]
    fn dispatch(
        &self,
        level: Level,
        msg: &dyn Display,
        fields: &Fields,
        caller_skip: Option<usize>,
    ) -> Result<(), crate::Error> {
        let settings = self.snapshot();
        if level < settings.level {
            return Ok(());
        }

        let time = settings.now.as_ref().map_or_else(Local::now, |now| now());
        let mut entity = Entity::new(&self.name, level, msg.to_string(), time)
            .with_fields(fields)
            .with_time_format(settings.time_format.as_deref());
        if let Some(skip) = caller_skip.or_else(|| settings.caller.skip_for(level)) {
            entity = entity.with_caller(caller::resolve(Location::caller(), skip));
        }

        let formatter: &dyn Formatter = match &settings.formatter {
            Some(f) => f.as_ref(),
            None => default_json_formatter(),
        };

        let mut buf = BUFFERS.get();
        let result = formatter
            .format(&entity, &mut buf)
            .and_then(|()| Ok(settings.sink.lock().write_all(&buf)?));

        if result.is_ok() {
            self.hooks.fire(&Summary::new(&entity, &buf));
        }

        match level {
            Level::Fatal => match &settings.exit {
                Some(exit) => exit(FATAL_EXIT_CODE),
                None => std::process::exit(FATAL_EXIT_CODE),
            },
            Level::Panic => match &settings.panic {
                Some(panic) => panic(entity.message()),
                None => panic!("{}", entity.message()),
            },
            _ => {}
        }

        result
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current minimum level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.settings.read().level
    }

    pub fn set_level(&self, level: Level) {
        self.update(|s| s.level = level);
    }

    /// Replaces the sink. Records already being written finish on the old one.
    pub fn set_output(&self, writer: impl Write + Send + 'static) {
        let sink = settings::sink(writer);
        self.update(|s| s.sink = sink);
    }

    /// `None` restores the default JSON formatter.
    pub fn set_formatter(&self, formatter: Option<Arc<dyn Formatter>>) {
        self.update(|s| s.formatter = formatter);
    }

    /// `None` restores the wall clock.
    pub fn set_now_fn(&self, now: Option<NowFn>) {
        self.update(|s| s.now = now);
    }

    /// strftime pattern for the record time; `None` restores RFC 3339.
    pub fn set_time_format(&self, format: Option<String>) {
        self.update(|s| s.time_format = format);
    }

    /// `None` restores the default, which exits the process.
    pub fn set_exit_fn(&self, exit: Option<ExitFn>) {
        self.update(|s| s.exit = exit);
    }

    /// `None` restores the default, which panics the logging thread.
    pub fn set_panic_fn(&self, panic: Option<PanicFn>) {
        self.update(|s| s.panic = panic);
    }

    /// Fatal and panic records are logged like any other and execution continues.
    pub fn disable_terminal_actions(&self) {
        self.update(|s| {
            s.exit = Some(Arc::new(|_| {}));
            s.panic = Some(Arc::new(|_| {}));
        });
    }

    /// Captures the caller on every level, `skip` frames above the call site.
    ///
    /// `skip == 0` is free: the call site comes from `#[track_caller]`. Any
    /// larger depth captures a full `std::backtrace::Backtrace` on every
    /// emitted record and reads frames from its rendered text, whose layout
    /// std does not guarantee. Frames without debug info, or a rendering this
    /// crate cannot read, resolve to [`UNKNOWN_CALLER`] rather than failing.
    pub fn enable_caller(&self, skip: usize) {
        self.update(|s| s.caller = CallerCapture::all(skip));
    }

    /// Captures the caller only on `levels`; other levels carry none.
    /// Non-zero `skip` has the costs described on [`Logger::enable_caller`].
    pub fn enable_levels_caller(&self, levels: &[Level], skip: usize) {
        let capture = CallerCapture::levels(levels, skip);
        self.update(|s| s.caller = capture);
    }

    pub fn disable_caller(&self) {
        self.update(|s| s.caller = CallerCapture::default());
    }

    /// Registers a hook for the levels it reports.
    pub fn add_hook(&self, hook: Arc<dyn Hook>) {
        self.hooks.add(hook);
    }

    /// Registers a closure for `levels`.
    pub fn add_hook_fn<F>(&self, levels: impl Into<Vec<Level>>, f: F)
    where
        F: Fn(&Summary<'_>) -> Result<(), crate::Error> + Send + Sync + 'static,
    {
        self.hooks.add(hook_fn(levels, f));
    }

    /// Hooks registered for `level`.
    #[must_use]
    pub fn hook_count(&self, level: Level) -> usize {
        self.hooks.count(level)
    }

    /// # Errors
    /// I/O errors from the sink.
    pub fn flush(&self) -> Result<(), crate::Error> {
        let settings = self.snapshot();
        settings.sink.lock().flush()?;
        Ok(())
    }

    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Serialize) -> Log<'_> {
        Log::new(self).with_field(key, value)
    }

    #[must_use]
    pub fn with_fields<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Log<'_>
    where
        K: Into<String>,
        V: Serialize,
    {
        Log::new(self).with_fields(fields)
    }

    /// Per-call caller capture, `skip` frames above the call site.
    /// Non-zero `skip` has the costs described on [`Logger::enable_caller`].
    #[must_use]
    pub fn with_caller(&self, skip: usize) -> Log<'_> {
        Log::new(self).with_caller(skip)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn log(&self, level: Level, msg: impl Display) -> Result<(), crate::Error> {
        self.dispatch(level, &msg, &EMPTY_FIELDS, None)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn trace(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.dispatch(Level::Trace, &msg, &EMPTY_FIELDS, None)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn debug(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.dispatch(Level::Debug, &msg, &EMPTY_FIELDS, None)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn info(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.dispatch(Level::Info, &msg, &EMPTY_FIELDS, None)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn warn(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.dispatch(Level::Warn, &msg, &EMPTY_FIELDS, None)
    }

    /// # Errors
    /// Formatter or sink errors.
    #[track_caller]
    pub fn error(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.dispatch(Level::Error, &msg, &EMPTY_FIELDS, None)
    }

    /// Logs, then runs the exit action with [`FATAL_EXIT_CODE`].
    ///
    /// # Errors
    /// Formatter or sink errors, when the exit action returns.
    #[track_caller]
    pub fn fatal(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.dispatch(Level::Fatal, &msg, &EMPTY_FIELDS, None)
    }

    /// Logs, then runs the panic action.
    ///
    /// # Errors
    /// Formatter or sink errors, when the panic action returns.
    #[track_caller]
    pub fn panic(&self, msg: impl Display) -> Result<(), crate::Error> {
        self.dispatch(Level::Panic, &msg, &EMPTY_FIELDS, None)
    }
}
