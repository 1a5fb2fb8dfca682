#![forbid(unsafe_code)]

//! `rotolog` - structured JSON logging with hooks and a size-rotating file writer.
//!
//! - Leveled log calls (`trace` through `panic`) filtered by a runtime-adjustable threshold
//! - JSON lines output with configurable key names
//! - Optional `file:line` caller capture, per level or per call
//! - Per-level hooks that observe each record after it was written
//! - A file sink that rotates at a size limit and keeps a bounded number of backups
//!
//! # Example
//!
//! ```
//! use rotolog::{Level, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .name("app")
//!     .level(Level::Debug)
//!     .output(sink.clone())
//!     .build();
//!
//! logger.info("Application started").unwrap();
//! logger.with_field("attempt", 3).warn("Connection timeout").unwrap();
//! logger.trace("dropped by the level filter").unwrap();
//!
//! assert_eq!(sink.contents().lines().count(), 2);
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod fmt;
pub mod internal;
pub mod level;
pub mod logger;
pub mod output;

pub use config::{Config, format_size, parse_size};
pub use entity::{Entity, Fields, Summary};
pub use error::Error;
pub use fmt::{Formatter, JsonFormatter, default_json_formatter};
pub use level::Level;
pub use logger::{FATAL_EXIT_CODE, Hook, Log, Logger, LoggerBuilder, UNKNOWN_CALLER, hook_fn};
pub use output::{MemorySink, RotatingFileWriter, list_backups};
