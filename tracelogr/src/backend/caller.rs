//! Caller attribution with a frame offset.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Source location a record is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    file: Cow<'static, str>,
    line: u32,
    column: Option<u32>,
}

impl Caller {
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
            column: Some(location.column()),
        }
    }
}

/// Renders as `file:line` or `file:line:column`.
impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}:{}", self.file, self.line, column),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

/// Attribute a record to the frame `offset` levels above `tracked`.
///
/// `tracked` is the location `#[track_caller]` resolved, i.e. the call into
/// the logger. With an offset of 0 that is the answer. Otherwise the stack
/// is walked until the frame containing `tracked` is found, and the frame
/// `offset` levels above it is reported. Frames without debug info are not
/// counted. When the walk cannot find the tracked frame, or the stack is
/// too short, `tracked` is reported unchanged.
pub fn resolve_caller(tracked: &'static Location<'static>, offset: usize) -> Caller {
    if offset == 0 {
        return Caller::from(tracked);
    }

    let mut above: Option<usize> = None;
    let mut found: Option<Caller> = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                return;
            };
            match above {
                None => {
                    if line == tracked.line() && file.ends_with(Path::new(tracked.file())) {
                        above = Some(0);
                    }
                }
                Some(depth) => {
                    let depth = depth + 1;
                    if depth == offset {
                        found = Some(Caller {
                            file: Cow::Owned(file.display().to_string()),
                            line,
                            column: symbol.colno(),
                        });
                    }
                    above = Some(depth);
                }
            }
        });
        found.is_none()
    });

    found.unwrap_or_else(|| Caller::from(tracked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline(never)]
    fn tracked_here() -> &'static Location<'static> {
        Location::caller()
    }

    #[inline(never)]
    fn resolve_from_helper(offset: usize) -> Caller {
        resolve_caller(Location::caller(), offset)
    }

    #[test]
    fn test_zero_offset_is_tracked_location() {
        let location = tracked_here();
        let caller = resolve_caller(location, 0);
        assert_eq!(caller.file(), location.file());
        assert_eq!(caller.line(), location.line());
        assert_eq!(caller.column(), Some(location.column()));
        assert_eq!(caller.to_string(), location.to_string());
    }

    #[test]
    fn test_offset_reports_frame_above() {
        let line = line!() + 1;
        let caller = resolve_from_helper(1);
        assert!(caller.file().ends_with("caller.rs"), "{caller}");
        assert_eq!(caller.line(), line, "{caller}");
    }

    #[test]
    fn test_offset_past_stack_falls_back() {
        let caller = resolve_from_helper(100_000);
        assert!(caller.file().ends_with("caller.rs"));
        assert!(caller.column().is_some());
    }

    #[test]
    fn test_display_without_column() {
        let caller = Caller {
            file: Cow::Borrowed("src/main.rs"),
            line: 7,
            column: None,
        };
        assert_eq!(caller.to_string(), "src/main.rs:7");
    }
}
