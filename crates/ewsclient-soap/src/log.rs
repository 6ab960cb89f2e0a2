//! Ordered diagnostic log attached to builders and sessions.

use std::fmt;

use chrono::{DateTime, Local};
use ewsclient_schema::{Severity, Validation};

/// Diagnostic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Request and response dumps.
    Debug,
    /// Progress.
    Info,
    /// Recoverable problems, e.g. a dropped recipient.
    Warn,
    /// Failures.
    Error,
    /// Failures that make the operation meaningless.
    Crit,
}

impl Level {
    /// Uppercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Crit => "CRIT",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => Self::Info,
            Severity::Warning => Self::Warn,
            Severity::Error => Self::Error,
        }
    }
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the entry was recorded.
    pub timestamp: DateTime<Local>,
    /// Component that recorded it.
    pub origin: String,
    /// Level.
    pub level: Level,
    /// Single-line message.
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timestamp = self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string();
        write!(
            f,
            "{timestamp:26} | {} | {} | {}",
            self.origin, self.level, self.message
        )
    }
}

/// Ordered log buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    origin: String,
    entries: Vec<LogEntry>,
}

impl Diagnostics {
    /// Creates an empty buffer whose entries are attributed to `origin`.
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: Vec::new(),
        }
    }

    /// Records a message, one entry per line.
    pub fn push(&mut self, level: Level, message: impl AsRef<str>) {
        for line in message.as_ref().lines() {
            tracing::debug!(origin = %self.origin, level = %level, "{line}");
            self.entries.push(LogEntry {
                timestamp: Local::now(),
                origin: self.origin.clone(),
                level,
                message: line.to_string(),
            });
        }
    }

    /// Records a DEBUG entry.
    pub fn debug(&mut self, message: impl AsRef<str>) {
        self.push(Level::Debug, message);
    }

    /// Records an INFO entry.
    pub fn info(&mut self, message: impl AsRef<str>) {
        self.push(Level::Info, message);
    }

    /// Records a WARN entry.
    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.push(Level::Warn, message);
    }

    /// Records an ERROR entry.
    pub fn error(&mut self, message: impl AsRef<str>) {
        self.push(Level::Error, message);
    }

    /// Records a CRIT entry.
    pub fn crit(&mut self, message: impl AsRef<str>) {
        self.push(Level::Crit, message);
    }

    /// Records every diagnostic of a validation run.
    pub fn record_validation(&mut self, validation: &Validation) {
        for diagnostic in &validation.diagnostics {
            self.push(diagnostic.severity.into(), &diagnostic.message);
        }
    }

    /// True when any ERROR or CRIT entry exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level >= Level::Error)
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Appends another buffer's entries, keeping their origin.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Origin attached to new entries.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = LogEntry;
    type IntoIter = std::vec::IntoIter<LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_messages_are_split() {
        let mut log = Diagnostics::new("email");
        log.info("first\nsecond");
        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().nth(1).unwrap().message, "second");
    }

    #[test]
    fn test_has_errors() {
        let mut log = Diagnostics::new("email");
        log.warn("dropped");
        assert!(!log.has_errors());
        log.crit("No attachments");
        assert!(log.has_errors());
        log.clear();
        assert!(log.is_empty());
        assert!(!log.has_errors());
    }

    #[test]
    fn test_entry_format() {
        let mut log = Diagnostics::new("session");
        log.error("boom");
        let line = log.iter().next().unwrap().to_string();
        assert!(line.ends_with(" | session | ERROR | boom"));
        assert_eq!(line.find(" | "), Some(26));
    }

    #[test]
    fn test_extend_keeps_origin() {
        let mut outer = Diagnostics::new("session");
        let mut inner = Diagnostics::new("attachment");
        inner.warn("skipped");
        outer.extend(inner);
        assert_eq!(outer.iter().next().unwrap().origin, "attachment");
    }
}
