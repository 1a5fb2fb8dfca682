//! Everything a single log call reads from the logger's configuration.
//!
//! Held behind an `Arc` and replaced wholesale by setters, so a call in flight
//! always works from one consistent snapshot.

use crate::fmt::Formatter;
use crate::level::Level;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Clock used to stamp entities.
pub type NowFn = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;
/// Runs after a fatal record with the exit code.
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;
/// Runs after a panic record with the message.
pub type PanicFn = Arc<dyn Fn(&str) + Send + Sync>;

pub(super) type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

pub(super) fn sink(writer: impl Write + Send + 'static) -> Sink {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Which levels capture their call site, and how many frames above it to report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct CallerCapture {
    mask: u8,
    skip: usize,
}

impl CallerCapture {
    pub(super) const fn all(skip: usize) -> Self {
        Self { mask: 0x7f, skip }
    }

    pub(super) fn levels(levels: &[Level], skip: usize) -> Self {
        let mask = levels.iter().fold(0u8, |m, l| m | (1 << l.rank()));
        Self { mask, skip }
    }

    /// Skip depth for `level`, or `None` when this level carries no caller.
    pub(super) const fn skip_for(self, level: Level) -> Option<usize> {
        if self.mask & (1 << level.rank()) == 0 {
            None
        } else {
            Some(self.skip)
        }
    }
}

#[derive(Clone)]
pub(super) struct Settings {
    pub(super) level: Level,
    pub(super) sink: Sink,
    /// `None` uses the shared default JSON formatter.
    pub(super) formatter: Option<Arc<dyn Formatter>>,
    /// `None` uses the wall clock.
    pub(super) now: Option<NowFn>,
    pub(super) time_format: Option<String>,
    pub(super) caller: CallerCapture,
    /// `None` exits the process.
    pub(super) exit: Option<ExitFn>,
    /// `None` panics the calling thread.
    pub(super) panic: Option<PanicFn>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: Level::default(),
            sink: sink(std::io::stdout()),
            formatter: None,
            now: None,
            time_format: None,
            caller: CallerCapture::default(),
            exit: None,
            panic: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_all_covers_every_level() {
        let c = CallerCapture::all(2);
        for level in Level::all() {
            assert_eq!(c.skip_for(level), Some(2));
        }
    }

    #[test]
    fn capture_subset_only_covers_listed_levels() {
        let c = CallerCapture::levels(&[Level::Debug, Level::Panic], 0);
        assert_eq!(c.skip_for(Level::Debug), Some(0));
        assert_eq!(c.skip_for(Level::Panic), Some(0));
        assert_eq!(c.skip_for(Level::Info), None);
        assert_eq!(CallerCapture::default().skip_for(Level::Debug), None);
    }
}
