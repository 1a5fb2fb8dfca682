//! Naming, discovery, compression and pruning of rotated backups.
//!
//! A backup of `app.log` is `app.log.<ULID>`, or `app.log.<ULID>.gz` once
//! compressed. ULIDs sort lexicographically by creation time, so name order is
//! rotation order.

use crate::internal;
use flate2::Compression;
use flate2::write::GzEncoder;
use regex::Regex;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use ulid::Ulid;

/// `<path>.<ulid>` next to the active file.
pub(super) fn backup_path(path: &Path, id: Ulid) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(id.to_string());
    PathBuf::from(name)
}

/// Matches backups of `file_name` and captures the ULID.
fn backup_pattern(file_name: &str) -> Regex {
    let pattern = format!(
        r"^{}\.([0-9A-HJKMNP-TV-Z]{{26}})(?:\.gz)?$",
        regex::escape(file_name)
    );
    // Escaped literal plus a fixed suffix always compiles.
    Regex::new(&pattern).unwrap_or_else(|e| unreachable!("{e}"))
}

/// Backups of the log file at `path`, newest first.
///
/// # Errors
/// I/O errors from reading the parent directory.
pub fn list_backups(path: &Path) -> io::Result<Vec<PathBuf>> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let pattern = backup_pattern(file_name);

    let mut found: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(caps) = pattern.captures(name) {
            found.push((caps[1].to_string(), entry.path()));
        }
    }

    found.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(found.into_iter().map(|(_, p)| p).collect())
}

/// Deletes every backup of `path` beyond the `keep` newest.
/// Failures are reported and skipped; returns how many files were removed.
pub(super) fn prune(path: &Path, keep: usize) -> usize {
    let backups = match list_backups(path) {
        Ok(b) => b,
        Err(e) => {
            internal::warn(
                "ROTATE",
                &format!("Failed to list backups of {}: {e}", path.display()),
            );
            return 0;
        }
    };

    internal::trace(
        "ROTATE",
        &format!("{} backups of {}, keeping {keep}", backups.len(), path.display()),
    );

    let mut removed = 0;
    for old in backups.iter().skip(keep) {
        match fs::remove_file(old) {
            Ok(()) => {
                internal::debug("ROTATE", &format!("Removed backup {}", old.display()));
                removed += 1;
            }
            Err(e) => internal::warn(
                "ROTATE",
                &format!("Failed to remove backup {}: {e}", old.display()),
            ),
        }
    }
    removed
}

/// Gzips `path` to `path.gz` and removes the original. On failure the partial
/// `.gz` is removed and the uncompressed file stays.
pub(super) fn compress(path: &Path) -> io::Result<PathBuf> {
    let mut gz_path = OsString::from(path.as_os_str());
    gz_path.push(".gz");
    let gz_path = PathBuf::from(gz_path);

    let result = (|| -> io::Result<()> {
        let mut reader = BufReader::new(File::open(path)?);
        let writer = BufWriter::new(File::create(&gz_path)?);
        let mut encoder = GzEncoder::new(writer, Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.into_inner().map_err(io::IntoInnerError::into_error)?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&gz_path);
        return Err(e);
    }

    fs::remove_file(path)?;
    Ok(gz_path)
}
