//! Call-site attribution
//!
//! Emitting methods on the facade are `#[track_caller]`, so the direct call
//! site is always known without touching the stack. Skipping further frames
//! needs a captured backtrace: the tracked call site is located in it and
//! the walk continues `skip` frames towards the root. If the stack cannot be
//! symbolized (stripped binaries, missing debug info) the direct call site is
//! reported instead.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Field key carrying the `file:line` of the attributed call site
pub const CALLER_KEY: &str = "caller";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerInfo {
    pub file: String,
    pub line: u32,
}

impl CallerInfo {
    fn matches(&self, origin: &Location<'_>) -> bool {
        self.line == origin.line() && normalize(&self.file).ends_with(&normalize(origin.file()))
    }
}

impl From<&Location<'_>> for CallerInfo {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}

impl fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Attribute a record to `origin`, or to the frame `skip` levels above it
pub fn resolve(origin: &Location<'_>, skip: usize) -> CallerInfo {
    let direct = CallerInfo::from(origin);
    if skip == 0 {
        return direct;
    }

    let frames = captured_frames();
    frames
        .iter()
        .position(|frame| frame.matches(origin))
        .and_then(|index| index.checked_add(skip))
        .and_then(|index| frames.get(index))
        .cloned()
        .unwrap_or(direct)
}

/// Source locations of the current stack, innermost first
fn captured_frames() -> Vec<CallerInfo> {
    let rendered = format!("{:#}", Backtrace::force_capture());
    let cwd = std::env::current_dir().ok();

    rendered
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("at "))
        .filter_map(parse_location)
        .map(|mut frame| {
            if let Some(ref cwd) = cwd {
                if let Ok(relative) = Path::new(&frame.file).strip_prefix(cwd) {
                    frame.file = relative.display().to_string();
                }
            }
            frame
        })
        .collect()
}

/// Parse `path:line:column` or `path:line`
fn parse_location(text: &str) -> Option<CallerInfo> {
    let (rest, last) = text.rsplit_once(':')?;
    let last: u32 = last.parse().ok()?;

    match rest.rsplit_once(':') {
        Some((path, line)) if line.parse::<u32>().is_ok() => Some(CallerInfo {
            file: path.to_string(),
            line: line.parse().ok()?,
        }),
        _ => Some(CallerInfo {
            file: rest.to_string(),
            line: last,
        }),
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}
