//! Turns a call site into `"file:line"`.
//!
//! Every public logging method is `#[track_caller]`, so the location handed in
//! here is already the user's call site. Skipping further frames walks a
//! captured backtrace: the frame matching that location is the anchor, and
//! the frame `skip` positions above it is reported.
//!
//! The rendered backtrace text is the only stable-Rust access to frame
//! locations std offers, and its layout is not part of std's API. A layout
//! these patterns do not match yields no frames and therefore `???:0`.

use regex::Regex;
use std::backtrace::Backtrace;
use std::panic::Location;
use std::path::Path;
use std::sync::OnceLock;

/// Reported when the requested frame does not exist or has no debug info.
pub const UNKNOWN_CALLER: &str = "???:0";

static FRAME_START: OnceLock<Regex> = OnceLock::new();
static FRAME_LOCATION: OnceLock<Regex> = OnceLock::new();

fn basename(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file)
}

/// Caller string for `location` after ascending `skip` frames. Never fails.
pub(super) fn resolve(location: &Location<'_>, skip: usize) -> String {
    if skip == 0 {
        return format!("{}:{}", basename(location.file()), location.line());
    }

    let frames = frames(&Backtrace::force_capture().to_string());
    let anchor = frames.iter().position(|frame| {
        frame.as_ref().is_some_and(|(file, line)| {
            *line == location.line() && Path::new(file).ends_with(location.file())
        })
    });

    match anchor.and_then(|i| frames.get(i + skip)) {
        Some(Some((file, line))) => format!("{}:{line}", basename(file)),
        _ => UNKNOWN_CALLER.to_string(),
    }
}

/// One entry per printed frame, innermost first; `None` for frames without a source location.
fn frames(rendered: &str) -> Vec<Option<(String, u32)>> {
    let start = FRAME_START.get_or_init(|| Regex::new(r"^\s*\d+: ").unwrap_or_else(|e| unreachable!("{e}")));
    let at = FRAME_LOCATION.get_or_init(|| {
        Regex::new(r"^\s+at (.+?):(\d+)(?::\d+)?$").unwrap_or_else(|e| unreachable!("{e}"))
    });

    let mut frames = Vec::new();
    for line in rendered.lines() {
        if start.is_match(line) {
            frames.push(None);
        } else if let Some(caps) = at.captures(line)
            && let Some(last) = frames.last_mut()
            && last.is_none()
            && let Ok(n) = caps[2].parse()
        {
            *last = Some((caps[1].to_string(), n));
        }
    }
    frames
}
