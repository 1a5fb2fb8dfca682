//! Turning an `Entity` into bytes is pluggable: the logger only knows the
//! `Formatter` trait, and the JSON formatter is the built-in implementation.

mod json;
mod pool;

pub use json::{JsonFormatter, KEYS, default_json_formatter};
pub use pool::{Pool, Pooled, Reset};

use crate::entity::Entity;

/// `Send + Sync` so one formatter can serve every thread logging through a shared `Logger`.
pub trait Formatter: Send + Sync {
    /// Appends exactly one record, including its trailing newline, to `buf`.
    ///
    /// Implementations must not keep a reference to `buf` after returning.
    ///
    /// # Errors
    /// `Error::Format` when the entity cannot be rendered.
    fn format(&self, entity: &Entity<'_>, buf: &mut Vec<u8>) -> Result<(), crate::Error>;
}

/// Closures are formatters, which keeps test doubles one line long.
impl<F> Formatter for F
where
    F: Fn(&Entity<'_>, &mut Vec<u8>) -> Result<(), crate::Error> + Send + Sync,
{
    fn format(&self, entity: &Entity<'_>, buf: &mut Vec<u8>) -> Result<(), crate::Error> {
        self(entity, buf)
    }
}
