//! Byte sinks a `Logger` can write to. Any `io::Write + Send` works; these are
//! the two built in: a size-rotating file and an in-memory buffer.

mod backup;
mod file;
mod memory;

pub use backup::list_backups;
pub use file::RotatingFileWriter;
pub use memory::MemorySink;
