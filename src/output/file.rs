//! Append-only log file that rotates itself once it reaches a size limit.
//!
//! One mutex covers size accounting, the append, and any rotation the append
//! triggers, so concurrent writers can neither interleave with a rotation nor
//! rotate twice. The size check runs after each append: a write that reaches
//! or crosses `max_size` is kept whole in the file being rotated out.

use super::backup;
use crate::internal;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use ulid::{Generator, Ulid};

struct State {
    /// `None` once closed.
    file: Option<File>,
    /// Bytes in the active file.
    size: u64,
    /// Monotonic within this writer, so backup names never collide.
    ids: Generator,
}

/// Size-rotating file sink.
///
/// `&RotatingFileWriter` implements `io::Write`, so one writer can be shared
/// between threads behind an `Arc`.
pub struct RotatingFileWriter {
    path: PathBuf,
    max_size: u64,
    backups: usize,
    compress: bool,
    state: Mutex<State>,
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("path", &self.path)
            .field("max_size", &self.max_size)
            .field("backups", &self.backups)
            .field("compress", &self.compress)
            .finish_non_exhaustive()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// `write_all` that adds every byte that landed to `size`, including the
/// prefix written before a failure.
fn write_counted(out: &mut impl Write, buf: &[u8], size: &mut u64) -> io::Result<()> {
    let mut rest = buf;
    while !rest.is_empty() {
        match out.write(rest) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => {
                *size += n as u64;
                rest = &rest[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

impl RotatingFileWriter {
    /// Opens (or creates) `path` for appending. Missing parent directories are created.
    ///
    /// `max_size` of `0` disables rotation. After each rotation only the
    /// `backups` newest backups are kept; with `0` every earlier backup is
    /// deleted and only the one just produced survives.
    ///
    /// Bytes already in an existing file count toward `max_size`.
    ///
    /// # Errors
    /// `Error::InvalidWriterTarget` if `path` is a directory, `Error::Io` if it cannot be opened.
    pub fn new(path: impl Into<PathBuf>, max_size: u64, backups: usize) -> Result<Self, crate::Error> {
        let path = path.into();
        if path.is_dir() {
            return Err(crate::Error::InvalidWriterTarget(path));
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            internal::debug("FILE", &format!("Created directory: {}", parent.display()));
        }

        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        internal::debug(
            "FILE",
            &format!("Opened {} ({size} bytes, max {max_size})", path.display()),
        );

        Ok(Self {
            path,
            max_size,
            backups,
            compress: false,
            state: Mutex::new(State {
                file: Some(file),
                size,
                ids: Generator::new(),
            }),
        })
    }

    /// Like [`RotatingFileWriter::new`] for targets already known to be valid.
    ///
    /// # Panics
    /// Panics when the file cannot be opened.
    #[must_use]
    pub fn must_new(path: impl Into<PathBuf>, max_size: u64, backups: usize) -> Self {
        Self::new(path, max_size, backups).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Gzip each backup right after it is rotated out.
    #[must_use]
    pub const fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Bytes in the active file.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.state.lock().size
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().file.is_none()
    }

    /// Backups currently on disk, newest first.
    ///
    /// # Errors
    /// I/O errors from reading the directory.
    pub fn backups(&self) -> Result<Vec<PathBuf>, crate::Error> {
        Ok(backup::list_backups(&self.path)?)
    }

    /// Appends `buf` whole, then rotates if the active file reached `max_size`.
    ///
    /// A failed rotation is returned as an error even though `buf` is already
    /// in the active file; the writer stays on that file and retries the
    /// rotation after each later append. The `io::Write` impls report such a
    /// write as successful instead, since its bytes landed.
    ///
    /// # Errors
    /// `Error::WriterClosed` after [`close`](Self::close); `Error::Io` if the
    /// append or the rename/reopen step of a rotation fails.
    pub fn write_bytes(&self, buf: &[u8]) -> Result<usize, crate::Error> {
        match self.append(buf)? {
            None => Ok(buf.len()),
            Some(rotation) => Err(rotation),
        }
    }

    /// Appends under the lock. The outer error means `buf` did not fully land;
    /// the inner one is a rotation failure after a complete append.
    fn append(&self, buf: &[u8]) -> Result<Option<crate::Error>, crate::Error> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(file) = state.file.as_mut() else {
            return Err(crate::Error::WriterClosed);
        };

        write_counted(file, buf, &mut state.size)?;

        if self.max_size > 0 && state.size >= self.max_size {
            return Ok(self.rotate(state).err());
        }
        Ok(None)
    }

    /// Close, rename aside, reopen fresh. A failed rename or reopen restores
    /// the pre-rotation file so no data is lost track of.
    fn rotate(&self, state: &mut State) -> Result<(), crate::Error> {
        let id = state.ids.generate().unwrap_or_else(|_| Ulid::new());
        let target = backup::backup_path(&self.path, id);

        drop(state.file.take());

        if let Err(e) = fs::rename(&self.path, &target) {
            internal::error(
                "ROTATE",
                &format!("Failed to rename {}: {e}", self.path.display()),
            );
            self.reopen(state)?;
            return Err(e.into());
        }

        match open_append(&self.path) {
            Ok(fresh) => {
                state.file = Some(fresh);
                state.size = 0;
            }
            Err(e) => {
                internal::error(
                    "ROTATE",
                    &format!("Failed to reopen {}: {e}", self.path.display()),
                );
                fs::rename(&target, &self.path)?;
                self.reopen(state)?;
                return Err(e.into());
            }
        }

        internal::debug(
            "ROTATE",
            &format!("Rotated {} to {}", self.path.display(), target.display()),
        );

        if self.compress
            && let Err(e) = backup::compress(&target)
        {
            internal::warn(
                "ROTATE",
                &format!("Failed to compress {}: {e}", target.display()),
            );
        }

        backup::prune(&self.path, self.backups.max(1));
        Ok(())
    }

    /// Reattaches to whatever is at `path` after a failed rotation; the size
    /// is re-read so it matches that file.
    fn reopen(&self, state: &mut State) -> io::Result<()> {
        let file = open_append(&self.path)?;
        state.size = file.metadata()?.len();
        state.file = Some(file);
        Ok(())
    }

    /// Flushes the active file.
    ///
    /// # Errors
    /// I/O errors from the file.
    pub fn flush(&self) -> Result<(), crate::Error> {
        if let Some(file) = self.state.lock().file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    /// Releases the file handle. Later writes fail with `Error::WriterClosed`;
    /// closing twice is a no-op.
    ///
    /// # Errors
    /// I/O errors from syncing the file.
    pub fn close(&self) -> Result<(), crate::Error> {
        let file = self.state.lock().file.take();
        if let Some(file) = file {
            file.sync_all()?;
            internal::debug("FILE", &format!("Closed {}", self.path.display()));
        }
        Ok(())
    }
}

/// A rotation failure after a complete append is already reported on the
/// internal logger; the bytes landed, so the write itself succeeded.
impl Write for &RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(RotatingFileWriter::flush(*self)?)
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(Self::flush(self)?)
    }
}
